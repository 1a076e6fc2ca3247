//! HTTP surface constants.

/// Main page of the locally owned customer.
pub const ENDPOINT_HOME: &str = "/";
/// Customer page; served locally or redirected to the owning machine.
pub const ENDPOINT_CUSTOMER: &str = "/customers/:id";

/// Response header asking the platform edge to replay the request elsewhere.
pub const REPLAY_HEADER: &str = "fly-replay";

/// Header value instructing a replay on `machine_id`.
pub fn replay_directive(machine_id: &str) -> String {
    format!("instance={}", machine_id)
}
