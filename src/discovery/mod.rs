//! Machine Discovery Module
//!
//! Maps a customer to the machine currently serving it. Nothing is cached: the
//! hosting platform's name service is the source of truth and is asked again on
//! every routing request.
//!
//! ## Resolution
//! 1. Build the per-customer discovery hostname from the customer id and the app name.
//! 2. Forward lookup of that hostname to an address.
//! 3. Reverse lookup of the address to a hostname; its leading label is the machine id.
//!
//! Any failure along the way resolves to "no machine". Without an app name
//! (local/dev mode) every customer resolves to a fixed placeholder machine.
//!
//! ## Submodules
//! - **`resolver`**: `MachineResolver` trait with the DNS and local implementations.
//! - **`dns`**: `NameService` trait and its `hickory-resolver` implementation.
//! - **`types`**: `MachineId` and `LookupError`.

pub mod dns;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod tests;
