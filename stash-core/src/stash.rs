//! The deterministic encrypted store facade: encrypt-then-address on
//! the way in, fetch-then-decrypt on the way out.

use std::sync::Arc;

use crate::crypto;
use crate::error::Result;
use crate::reference::Reference;
use crate::storage::{sha256_addresser, ContentAddressedStore, Store};

/// Composes the crypto primitive with a content-addressed store.
///
/// Owns no persistent state of its own: ciphertext lives in the
/// injected [`Store`], references belong to the caller.
pub struct Stash {
    store: ContentAddressedStore,
}

impl Stash {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store: ContentAddressedStore::new(sha256_addresser, store),
        }
    }

    /// Encrypt `data` under a key derived from it, write the
    /// ciphertext at its address, and return the reference.
    pub async fn put(&self, data: &[u8], salt: &[u8]) -> Result<Reference> {
        let blob = crypto::encrypt(data, salt);
        let address = self.store.put(&blob.encrypted_data).await?;
        Ok(Reference::new(
            address,
            blob.secret_key.to_vec(),
            salt.to_vec(),
        ))
    }

    /// Fetch the ciphertext a reference points at and decrypt it.
    pub async fn get(&self, reference: &Reference) -> Result<Vec<u8>> {
        reference.check_decryptable()?;
        let encrypted_data = self.store.get(&reference.address).await?;
        let data = crypto::decrypt(&reference.secret_key, &encrypted_data, &reference.salt)?;
        Ok(data)
    }

    /// Like [`Stash::put`], but only compute the reference. Nothing is
    /// written.
    pub fn reference(&self, data: &[u8], salt: &[u8]) -> Reference {
        let blob = crypto::encrypt(data, salt);
        let address = self.store.address(&blob.encrypted_data);
        Reference::new(address, blob.secret_key.to_vec(), salt.to_vec())
    }

    /// The underlying content-addressed store (the Storage RPC service
    /// operates on this directly).
    pub fn store(&self) -> &ContentAddressedStore {
        &self.store
    }
}
