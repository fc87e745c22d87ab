/// Secret key length in bytes (SHA-256 output).
pub const SECRET_KEY_LEN: usize = 32;

/// Address length in bytes (SHA-256 output).
pub const ADDRESS_LEN: usize = 32;

/// ChaCha20 nonce length (12 bytes, RFC 8439).
pub const NONCE_LEN: usize = 12;

/// Default address the daemon listens on.
pub const DEFAULT_LISTEN_ADDRESS: &str = "tcp://localhost:53431";

/// Maximum RPC frame payload: 64 MB.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;
