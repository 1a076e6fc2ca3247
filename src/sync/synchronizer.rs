use super::types::{AcquireOutcome, ReleaseOutcome, StartupAction, SyncError};
use crate::durable::client::DurableStore;
use crate::durable::types::{StoreError, tenant_state_key};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// SQLite sidecar files that belong to the state file and go wherever it goes.
const SIDECAR_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// Keeps the local state file and the Durable Store copy consistent across
/// the process's start/stop boundary for one tenant.
pub struct StateSynchronizer {
    store: Arc<dyn DurableStore>,
    tenant_id: String,
    key: String,
    local_path: PathBuf,
    released: AtomicBool,
}

impl StateSynchronizer {
    pub fn new(store: Arc<dyn DurableStore>, tenant_id: &str, local_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            tenant_id: tenant_id.to_string(),
            key: tenant_state_key(tenant_id),
            local_path: local_path.into(),
            released: AtomicBool::new(false),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Startup decision: reset when requested, acquire otherwise.
    pub async fn startup(&self, reset_requested: bool) -> Result<StartupAction, SyncError> {
        if reset_requested {
            self.reset().await?;
            return Ok(StartupAction::Reset);
        }

        Ok(StartupAction::Acquired(self.acquire().await))
    }

    /// Checks the tenant's state out of the Durable Store onto local disk.
    ///
    /// Never fails: a store error is logged and the node proceeds without a
    /// local file, accepting fresh local state over refusing to start. Unless
    /// the blob is restored, any leftover local file is discarded so it can
    /// never be served or released.
    pub async fn acquire(&self) -> AcquireOutcome {
        let bytes = match self.store.fetch(&self.key).await {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound) => {
                tracing::info!(
                    "No durable state for customer {} at {}, starting empty",
                    self.tenant_id,
                    self.key
                );
                self.discard_leftovers().await;
                return AcquireOutcome::Absent;
            }
            Err(e) => {
                tracing::error!(
                    "Failed to fetch durable state for customer {}: {} (starting with fresh local state)",
                    self.tenant_id,
                    e
                );
                self.discard_leftovers().await;
                return AcquireOutcome::StoreUnavailable(e);
            }
        };

        let len = bytes.len();
        if let Err(e) = write_atomically(&self.local_path, &bytes).await {
            tracing::error!(
                "Failed to write acquired state to {:?}: {}",
                self.local_path,
                e
            );
            self.discard_leftovers().await;
            return AcquireOutcome::LocalWriteFailed(e.to_string());
        }

        tracing::info!(
            "Acquired {} bytes of state for customer {} into {:?}",
            len,
            self.tenant_id,
            self.local_path
        );
        AcquireOutcome::Restored { bytes: len }
    }

    /// Checks the local state back into the Durable Store.
    ///
    /// Only the first call does anything; later calls return
    /// `AlreadyReleased` without reading or uploading.
    pub async fn release(&self) -> Result<ReleaseOutcome, SyncError> {
        if self.released.swap(true, Ordering::SeqCst) {
            tracing::debug!("Release already performed, skipping");
            return Ok(ReleaseOutcome::AlreadyReleased);
        }

        let bytes = tokio::fs::read(&self.local_path)
            .await
            .map_err(|source| SyncError::LocalIo {
                path: self.local_path.clone(),
                source,
            })?;
        let len = bytes.len();

        self.store.put(&self.key, bytes).await?;

        tracing::info!(
            "Released {} bytes of state for customer {} to {}",
            len,
            self.tenant_id,
            self.key
        );
        Ok(ReleaseOutcome::Uploaded { bytes: len })
    }

    /// Deletes the durable blob, then the local file.
    pub async fn reset(&self) -> Result<(), SyncError> {
        self.store.delete(&self.key).await?;
        self.remove_local().await?;

        tracing::warn!("Reset state for customer {}", self.tenant_id);
        Ok(())
    }

    /// Removes the local state file together with its SQLite sidecars.
    async fn remove_local(&self) -> Result<(), SyncError> {
        remove_if_present(&self.local_path).await?;
        for suffix in SIDECAR_SUFFIXES {
            remove_if_present(&sidecar_path(&self.local_path, suffix)).await?;
        }
        Ok(())
    }

    async fn discard_leftovers(&self) {
        if let Err(e) = self.remove_local().await {
            tracing::error!("Failed to discard leftover local state: {}", e);
        }
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

async fn remove_if_present(path: &Path) -> Result<(), SyncError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SyncError::LocalIo {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes through a temporary sibling and renames, so readers never observe a
/// half-written state file.
async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = sidecar_path(path, ".acquire");
    let written = match tokio::fs::write(&tmp, bytes).await {
        Ok(()) => tokio::fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };

    if written.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    written
}
