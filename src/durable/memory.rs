use super::client::DurableStore;
use super::types::StoreError;

use async_trait::async_trait;
use dashmap::DashMap;

/// In-process `DurableStore` backed by a `DashMap`.
#[derive(Default)]
pub struct MemoryStore {
    blobs: DashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.get(key).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, key: &str, bytes: Vec<u8>) {
        self.blobs.insert(key.to_string(), bytes);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.get(key).ok_or(StoreError::NotFound)
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.insert(key, bytes);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.blobs.remove(key);
        Ok(())
    }
}
