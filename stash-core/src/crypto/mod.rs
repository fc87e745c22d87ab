pub mod cipher;

use thiserror::Error;

pub use cipher::{decrypt, derive_nonce, derive_secret_key, encrypt, EncryptedBlob};

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    /// A stream cipher cannot structurally fail to decrypt; this
    /// variant exists for forward compatibility and for crypto errors
    /// reported by a remote peer.
    #[error("Cipher failure: {0}")]
    Cipher(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
