use thiserror::Error;

/// Failure taxonomy of the Durable Store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The key does not exist. Expected on a tenant's first run.
    #[error("object not found")]
    NotFound,
    /// Transport, auth or any other backend failure.
    #[error("durable store failure: {0}")]
    Backend(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Deterministic Durable Store key holding a tenant's state blob.
pub fn tenant_state_key(tenant_id: &str) -> String {
    format!("/tenant/{}/state", tenant_id)
}
