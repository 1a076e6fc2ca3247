use super::types::StoreError;
use async_trait::async_trait;

/// Blob operations against a durable object store.
///
/// Implementations perform exactly one attempt per call.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Returns the blob at `key`, or `StoreError::NotFound` if it does not exist.
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Creates or overwrites the blob at `key`.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;

    /// Removes the blob at `key`. An already-absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
