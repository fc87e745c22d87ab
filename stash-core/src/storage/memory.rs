use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Result, StashError};
use crate::storage::{StatInfo, Store};

/// In-memory backend for tests, local demos, and embedding.
pub struct MemoryStore {
    inner: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs held.
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn put(&self, address: &[u8], data: &[u8]) -> Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StashError::Internal("memory store lock poisoned".to_string()))?;
        map.insert(address.to_vec(), data.to_vec());
        Ok(())
    }

    async fn get(&self, address: &[u8]) -> Result<Vec<u8>> {
        let map = self
            .inner
            .read()
            .map_err(|_| StashError::Internal("memory store lock poisoned".to_string()))?;
        map.get(address).cloned().ok_or_else(|| {
            StashError::NotFound(format!("blob not found: {}", hex::encode(address)))
        })
    }

    async fn stat(&self, address: &[u8]) -> Result<StatInfo> {
        let map = self
            .inner
            .read()
            .map_err(|_| StashError::Internal("memory store lock poisoned".to_string()))?;
        Ok(match map.get(address) {
            Some(data) => StatInfo {
                exists: true,
                size: data.len() as u64,
            },
            None => StatInfo::absent(),
        })
    }

    fn location(&self, address: &[u8]) -> String {
        format!("memory://{}", hex::encode(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        store.put(b"addr", b"payload").await.unwrap();
        assert_eq!(store.get(b"addr").await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get(b"missing").await,
            Err(StashError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stat_missing_is_not_an_error() {
        let store = MemoryStore::new();
        let stat = store.stat(b"missing").await.unwrap();
        assert!(!stat.exists);
        assert_eq!(stat.size, 0);
    }

    #[tokio::test]
    async fn test_overwrite_is_permitted() {
        let store = MemoryStore::new();
        store.put(b"addr", b"data").await.unwrap();
        store.put(b"addr", b"data").await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_location_is_a_uri() {
        let store = MemoryStore::new();
        assert_eq!(store.location(&[0xAB, 0xCD]), "memory://abcd");
    }
}
