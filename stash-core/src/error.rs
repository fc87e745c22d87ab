use thiserror::Error;

/// Top-level error type. Each variant is one kind in the error
/// taxonomy surfaced over the RPC channel; the core never recovers
/// errors locally.
#[derive(Error, Debug)]
pub enum StashError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Crypto error: {0}")]
    Crypto(#[from] crate::crypto::CryptoError),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StashError>;
