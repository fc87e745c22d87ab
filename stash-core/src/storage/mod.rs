pub mod cas;
pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::constants::ADDRESS_LEN;
use crate::error::Result;

pub use cas::ContentAddressedStore;
pub use memory::MemoryStore;

/// Existence and size of a blob. `exists == false` is an answer, not
/// an error; `size` is meaningful only when `exists` is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatInfo {
    pub exists: bool,
    pub size: u64,
}

impl StatInfo {
    pub fn absent() -> Self {
        Self {
            exists: false,
            size: 0,
        }
    }
}

/// Capability set the engine requires from any storage backend.
///
/// Implementations must be safe for concurrent reads and writes;
/// overwriting an address with identical data must be harmless
/// (content addressing makes concurrent puts of the same blob race
/// benignly).
#[async_trait]
pub trait Store: Send + Sync {
    /// Write `data` under `address`.
    async fn put(&self, address: &[u8], data: &[u8]) -> Result<()>;
    /// Read the blob at `address`; `NotFound` if absent.
    async fn get(&self, address: &[u8]) -> Result<Vec<u8>>;
    /// Existence and size of the blob at `address`.
    async fn stat(&self, address: &[u8]) -> Result<StatInfo>;
    /// Opaque locator (URI, path) for diagnostics. Need not be
    /// dereferenceable.
    fn location(&self, address: &[u8]) -> String;
}

/// Derives a store address from blob bytes. Expected to be a good
/// hash over the space of stored blobs.
pub type Addresser = fn(&[u8]) -> [u8; ADDRESS_LEN];

/// The default addresser: SHA-256 of the blob. A fresh hasher per
/// call; nothing is shared across invocations.
pub fn sha256_addresser(data: &[u8]) -> [u8; ADDRESS_LEN] {
    Sha256::digest(data).into()
}
