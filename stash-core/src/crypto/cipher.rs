//! Deterministic symmetric encryption.
//!
//! The secret key is SHA-256 of the plaintext, the nonce is SHA-256 of
//! the salt truncated to 12 bytes (all zeroes when the salt is empty),
//! and the cipher is plain ChaCha20. For a fixed (data, salt) pair the
//! ciphertext and key are byte-identical across calls, which is what
//! makes content addressing of ciphertext deduplicate.
//!
//! There is deliberately no authentication tag: a MAC would either
//! break determinism or leak plaintext equality. Any 32-byte key
//! decrypts any ciphertext into *some* bytes; integrity is the
//! caller's concern.

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::{ChaCha20, Key, Nonce};
use sha2::{Digest, Sha256};

use super::{CryptoError, Result};
use crate::constants::{NONCE_LEN, SECRET_KEY_LEN};

/// Output of [`encrypt`]: the ciphertext together with the key that
/// was derived from the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    pub encrypted_data: Vec<u8>,
    pub secret_key: [u8; SECRET_KEY_LEN],
}

/// Derive the secret key from the plaintext alone.
///
/// The salt plays no part here: a client holding only the plaintext
/// can reconstruct the key without contacting the store.
pub fn derive_secret_key(data: &[u8]) -> [u8; SECRET_KEY_LEN] {
    Sha256::digest(data).into()
}

/// Derive the stream-cipher nonce from the salt.
///
/// Empty salt maps to the all-zero nonce; otherwise the nonce is
/// SHA-256 of the salt truncated to 12 bytes. This choice is the
/// interoperability contract and must not change.
pub fn derive_nonce(salt: &[u8]) -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    if !salt.is_empty() {
        let digest = Sha256::digest(salt);
        nonce.copy_from_slice(&digest[..NONCE_LEN]);
    }
    nonce
}

/// Encrypt `data` deterministically under a key derived from `data`
/// itself, tweaked by `salt`.
///
/// Ciphertext length equals plaintext length (pure stream cipher).
pub fn encrypt(data: &[u8], salt: &[u8]) -> EncryptedBlob {
    let secret_key = derive_secret_key(data);
    let nonce = derive_nonce(salt);

    let mut encrypted_data = data.to_vec();
    let mut cipher = ChaCha20::new(Key::from_slice(&secret_key), Nonce::from_slice(&nonce));
    cipher.apply_keystream(&mut encrypted_data);

    EncryptedBlob {
        encrypted_data,
        secret_key,
    }
}

/// Decrypt `encrypted_data` with `secret_key`, reconstructing the
/// nonce from `salt`.
///
/// A stream cipher cannot structurally fail to decrypt: the only
/// reachable error is a key of the wrong length. A wrong key of the
/// right length yields garbled bytes, not an error.
pub fn decrypt(secret_key: &[u8], encrypted_data: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
    if secret_key.len() != SECRET_KEY_LEN {
        return Err(CryptoError::InvalidKeyLength {
            expected: SECRET_KEY_LEN,
            got: secret_key.len(),
        });
    }
    let nonce = derive_nonce(salt);

    let mut data = encrypted_data.to_vec();
    let mut cipher = ChaCha20::new(Key::from_slice(secret_key), Nonce::from_slice(&nonce));
    cipher.apply_keystream(&mut data);

    Ok(data)
}
