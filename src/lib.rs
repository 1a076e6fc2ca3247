//! Per-Customer Request Routing Library
//!
//! Routes HTTP requests for a customer to the single machine currently holding
//! that customer's state, and hands that state off between object storage and
//! local disk across machine restarts.
//!
//! ## Architecture Modules
//! - **`config`**: Environment configuration, read once at startup.
//! - **`durable`**: The Durable Store client (S3-compatible object storage) holding
//!   one state blob per customer.
//! - **`sync`**: The State Synchronizer. Acquires the customer's blob onto local disk
//!   at startup, releases it back on the first termination signal, or resets it.
//! - **`discovery`**: The Machine Resolver. Finds the machine serving a customer through
//!   a forward + reverse name-service lookup.
//! - **`routing`**: The HTTP entry point. Serves the local customer, redirects every
//!   other customer to its owning machine, or answers 404.
//! - **`local`**: The Local Service, a visit counter kept in the local SQLite file.

pub mod config;
pub mod discovery;
pub mod durable;
pub mod local;
pub mod routing;
pub mod sync;
