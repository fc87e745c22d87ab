pub mod fs;

use std::sync::Arc;

use stash_core::storage::{MemoryStore, Store};

use crate::config::StorageConfig;

pub use fs::FsStore;

/// Construct the configured storage backend.
pub fn open_store(config: &StorageConfig) -> Arc<dyn Store> {
    match config {
        StorageConfig::Memory => Arc::new(MemoryStore::new()),
        StorageConfig::Filesystem { root } => Arc::new(FsStore::new(root)),
    }
}
