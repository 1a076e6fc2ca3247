use super::protocol::{REPLAY_HEADER, replay_directive};
use crate::discovery::resolver::MachineResolver;
use crate::discovery::types::MachineId;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// What to answer for a customer this process does not own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Replay the request on this machine.
    RedirectTo(MachineId),
    /// No machine owns the customer.
    NotFound { tenant_id: String },
}

impl IntoResponse for RouteDecision {
    fn into_response(self) -> Response {
        match self {
            RouteDecision::RedirectTo(machine) => (
                StatusCode::OK,
                [(REPLAY_HEADER, replay_directive(machine.as_str()))],
            )
                .into_response(),
            RouteDecision::NotFound { tenant_id } => (
                StatusCode::NOT_FOUND,
                format!("customer {} not found", tenant_id),
            )
                .into_response(),
        }
    }
}

/// Resolves ownership per request; never inspects the request itself.
pub struct TenantRouter {
    resolver: Arc<dyn MachineResolver>,
}

impl TenantRouter {
    pub fn new(resolver: Arc<dyn MachineResolver>) -> Self {
        Self { resolver }
    }

    pub async fn route(&self, tenant_id: &str) -> RouteDecision {
        match self.resolver.resolve(tenant_id).await {
            Some(machine) => {
                tracing::debug!("Customer {} is served by machine {}", tenant_id, machine);
                RouteDecision::RedirectTo(machine)
            }
            None => {
                tracing::debug!("No machine serves customer {}", tenant_id);
                RouteDecision::NotFound {
                    tenant_id: tenant_id.to_string(),
                }
            }
        }
    }
}
