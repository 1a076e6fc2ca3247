//! Durable Store Module
//!
//! Typed access to the object store that holds each tenant's state blob between
//! machine lifetimes.
//!
//! ## Core Concepts
//! - **Keys**: One blob per tenant at a deterministic key (`/tenant/{id}/state`).
//! - **Contract**: `fetch`, `put` and `delete` with a two-way failure taxonomy
//!   (`NotFound` vs `Backend`). Absence on delete counts as success.
//! - **No retries**: Every call is attempted once; retry policy belongs to the caller.
//!
//! ## Submodules
//! - **`client`**: The `DurableStore` trait shared by all backends.
//! - **`s3`**: S3-compatible HTTP backend (path-style, SigV4 signed).
//! - **`signing`**: AWS Signature Version 4 request signing.
//! - **`memory`**: In-process backend for local development and tests.

pub mod client;
pub mod memory;
pub mod s3;
pub mod signing;
pub mod types;
