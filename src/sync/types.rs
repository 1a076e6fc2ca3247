use crate::durable::types::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The local state file is missing or unreadable.
    #[error("local state file {path:?}: {source}")]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of checking a tenant's state out of the Durable Store.
///
/// Every variant lets startup continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The blob was written to the local path.
    Restored { bytes: usize },
    /// No blob exists yet; no local file was written.
    Absent,
    /// The store could not be read; the node starts with fresh local state.
    StoreUnavailable(StoreError),
    /// The blob was fetched but could not be written locally.
    LocalWriteFailed(String),
}

/// Which branch of the startup decision ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupAction {
    Reset,
    Acquired(AcquireOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Uploaded { bytes: usize },
    /// A previous call already performed (or attempted) the upload.
    AlreadyReleased,
}

/// Process exit status for the result of `release()`.
pub fn release_exit_code(result: &Result<ReleaseOutcome, SyncError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
