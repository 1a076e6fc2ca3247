//! State Synchronization Module
//!
//! Moves a tenant's state file between the Durable Store and local disk across
//! the process's start/stop boundary, so that the machine serving a tenant owns
//! the only writable copy while it runs.
//!
//! ## Lifecycle
//! 1. **Startup**: Either `reset()` (when requested) or `acquire()`, never both.
//!    Acquire is best-effort: a missing blob or an unreachable store leaves no
//!    local file and the service still starts.
//! 2. **Serving**: The Local Service mutates the local file freely.
//! 3. **Shutdown**: The first SIGINT/SIGTERM triggers the shutdown context; the
//!    server is dropped and `release()` uploads the file exactly once.
//!
//! ## Submodules
//! - **`synchronizer`**: `StateSynchronizer` (acquire, release, reset, startup).
//! - **`shutdown`**: Once-only shutdown context fed by process signals.
//! - **`types`**: Outcomes and the `SyncError` taxonomy.

pub mod shutdown;
pub mod synchronizer;
pub mod types;
