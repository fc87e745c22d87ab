use std::sync::Arc;

use crate::error::Result;
use crate::storage::{Addresser, StatInfo, Store};

/// A store whose keys are derived from the values: `put` hashes the
/// data and the returned address is the authority. Callers never
/// supply addresses on write.
pub struct ContentAddressedStore {
    addresser: Addresser,
    store: Arc<dyn Store>,
}

impl ContentAddressedStore {
    pub fn new(addresser: Addresser, store: Arc<dyn Store>) -> Self {
        Self { addresser, store }
    }

    /// The would-be address of `data`, without writing anything.
    pub fn address(&self, data: &[u8]) -> Vec<u8> {
        (self.addresser)(data).to_vec()
    }

    /// Write `data` at its own address and return the address.
    pub async fn put(&self, data: &[u8]) -> Result<Vec<u8>> {
        let address = self.address(data);
        self.store.put(&address, data).await?;
        Ok(address)
    }

    pub async fn get(&self, address: &[u8]) -> Result<Vec<u8>> {
        self.store.get(address).await
    }

    pub async fn stat(&self, address: &[u8]) -> Result<StatInfo> {
        self.store.stat(address).await
    }

    pub fn location(&self, address: &[u8]) -> String {
        self.store.location(address)
    }
}
