use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use stash_core::error::{Result, StashError};
use stash_core::storage::{StatInfo, Store};

/// Filesystem backend. Each blob lives at `{root}/{hex_address}`.
///
/// Writes are plain overwrites: under content addressing an identical
/// address carries identical bytes, so concurrent puts of the same
/// blob race harmlessly.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn blob_path(&self, address: &[u8]) -> PathBuf {
        self.root.join(hex::encode(address))
    }
}

#[async_trait]
impl Store for FsStore {
    async fn put(&self, address: &[u8], data: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StashError::Io(format!("create blob root failed: {e}")))?;

        let path = self.blob_path(address);
        fs::write(&path, data)
            .await
            .map_err(|e| StashError::Io(format!("write blob failed: {e}")))?;

        debug!("Stored blob {} ({} bytes)", hex::encode(address), data.len());
        Ok(())
    }

    async fn get(&self, address: &[u8]) -> Result<Vec<u8>> {
        let path = self.blob_path(address);

        if !path.exists() {
            return Err(StashError::NotFound(format!(
                "blob not found: {}",
                hex::encode(address)
            )));
        }

        let data = fs::read(&path)
            .await
            .map_err(|e| StashError::Io(format!("read blob failed: {e}")))?;

        debug!(
            "Retrieved blob {} ({} bytes)",
            hex::encode(address),
            data.len()
        );
        Ok(data)
    }

    async fn stat(&self, address: &[u8]) -> Result<StatInfo> {
        let path = self.blob_path(address);
        match fs::metadata(&path).await {
            Ok(meta) => Ok(StatInfo {
                exists: true,
                size: meta.len(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StatInfo::absent()),
            Err(e) => Err(StashError::Io(format!("stat blob failed: {e}"))),
        }
    }

    fn location(&self, address: &[u8]) -> String {
        format!("file://{}", self.blob_path(address).display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FsStore) {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let (_dir, store) = store();
        store.put(&[0xAB; 32], b"ciphertext bytes").await.unwrap();
        assert_eq!(store.get(&[0xAB; 32]).await.unwrap(), b"ciphertext bytes");
    }

    #[tokio::test]
    async fn test_blob_lands_at_hex_path() {
        let (dir, store) = store();
        store.put(&[0xAB; 2], b"x").await.unwrap();
        assert!(dir.path().join("abab").exists());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(
            store.get(&[0u8; 32]).await,
            Err(StashError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stat_missing_is_not_an_error() {
        let (_dir, store) = store();
        let stat = store.stat(&[0u8; 32]).await.unwrap();
        assert!(!stat.exists);
        assert_eq!(stat.size, 0);
    }

    #[tokio::test]
    async fn test_stat_reports_size() {
        let (_dir, store) = store();
        store.put(&[0x01; 32], b"12345").await.unwrap();
        let stat = store.stat(&[0x01; 32]).await.unwrap();
        assert!(stat.exists);
        assert_eq!(stat.size, 5);
    }

    #[tokio::test]
    async fn test_overwrite_same_address_is_harmless() {
        let (_dir, store) = store();
        store.put(&[0x02; 32], b"blob").await.unwrap();
        store.put(&[0x02; 32], b"blob").await.unwrap();
        assert_eq!(store.get(&[0x02; 32]).await.unwrap(), b"blob");
    }

    #[test]
    fn test_location_is_a_file_uri() {
        let store = FsStore::new(Path::new("/data/blobs"));
        assert_eq!(store.location(&[0xAB, 0xCD]), "file:///data/blobs/abcd");
    }
}
