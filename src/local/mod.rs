//! Local Service Module
//!
//! The ordinary request handling that runs once a request has reached the
//! machine owning its customer. It only ever touches the local state file,
//! here a SQLite database holding a visit counter.
//!
//! The database handle is owned by a single `LocalStore` built at startup and
//! handed to the handlers; it opens lazily so a customer that was never
//! visited leaves no file behind for the synchronizer to upload.

pub mod handlers;
pub mod store;
