//! Request Routing Module
//!
//! Entry point for customer traffic. Requests for the customer this process
//! owns go to the Local Service; requests for any other customer are answered
//! with a redirect directive naming the machine that owns it, so the platform
//! edge re-dispatches them there. The body is never forwarded by this node.
//!
//! ## Submodules
//! - **`router`**: `TenantRouter` and the `RouteDecision` it produces.
//! - **`handlers`**: The axum application and `/customers/:id` dispatch.
//! - **`protocol`**: Endpoint paths and the redirect header.

pub mod handlers;
pub mod protocol;
pub mod router;
