use super::dns::{HickoryNameService, NameService};
use super::types::{LookupError, MachineId};
use crate::config::Config;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Machine id every customer resolves to when no app name is configured.
pub const LOCAL_MACHINE_ID: &str = "local";

/// Finds the machine currently serving a customer.
#[async_trait]
pub trait MachineResolver: Send + Sync {
    /// `None` means no owning machine could be found, for whatever reason.
    async fn resolve(&self, tenant_id: &str) -> Option<MachineId>;
}

/// Per-customer discovery hostname maintained by the hosting platform.
pub fn discovery_hostname(tenant_id: &str, app_name: &str) -> String {
    format!("customer{}.process.{}.internal", tenant_id, app_name)
}

/// Leading label of a (possibly fully-qualified) hostname.
pub fn machine_id_from_hostname(hostname: &str) -> Option<MachineId> {
    let label = hostname.trim_end_matches('.').split('.').next()?;
    if label.is_empty() {
        return None;
    }
    Some(MachineId(label.to_string()))
}

/// `customer{id}` must form a single DNS label of at most 63 bytes made of
/// letters, digits, `-` and `_`.
fn is_valid_tenant_label(tenant_id: &str) -> bool {
    !tenant_id.is_empty()
        && tenant_id.len() <= 55
        && tenant_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Local/dev mode: every customer lives on the placeholder machine.
pub struct LocalResolver;

#[async_trait]
impl MachineResolver for LocalResolver {
    async fn resolve(&self, _tenant_id: &str) -> Option<MachineId> {
        Some(MachineId(LOCAL_MACHINE_ID.to_string()))
    }
}

/// Forward-then-reverse lookup through a `NameService`.
pub struct DnsMachineResolver<N> {
    app_name: String,
    name_service: N,
}

impl<N: NameService> DnsMachineResolver<N> {
    pub fn new(app_name: &str, name_service: N) -> Self {
        Self {
            app_name: app_name.to_string(),
            name_service,
        }
    }

    pub fn name_service(&self) -> &N {
        &self.name_service
    }
}

fn absorb(step: &str, target: &str, err: LookupError) {
    match err {
        LookupError::NoRecords => {
            tracing::debug!("{} lookup for {} returned no records", step, target)
        }
        LookupError::Transport(e) => {
            tracing::warn!("{} lookup for {} failed: {}", step, target, e)
        }
    }
}

#[async_trait]
impl<N: NameService> MachineResolver for DnsMachineResolver<N> {
    async fn resolve(&self, tenant_id: &str) -> Option<MachineId> {
        if !is_valid_tenant_label(tenant_id) {
            tracing::debug!("Customer id {:?} cannot be resolved", tenant_id);
            return None;
        }

        let host = discovery_hostname(tenant_id, &self.app_name);
        let addr = match self.name_service.lookup_addr(&host).await {
            Ok(addr) => addr,
            Err(e) => {
                absorb("Forward", &host, e);
                return None;
            }
        };

        let hostname = match self.name_service.reverse_lookup(addr).await {
            Ok(hostname) => hostname,
            Err(e) => {
                absorb("Reverse", &addr.to_string(), e);
                return None;
            }
        };

        let machine = machine_id_from_hostname(&hostname);
        tracing::debug!("Customer {} -> {} -> {} -> {:?}", tenant_id, host, addr, machine);
        machine
    }
}

/// DNS resolution when an app name is configured, placeholder otherwise.
pub fn resolver_from_config(config: &Config) -> Result<Arc<dyn MachineResolver>> {
    match &config.app_name {
        Some(app_name) => Ok(Arc::new(DnsMachineResolver::new(
            app_name,
            HickoryNameService::from_system_conf()?,
        ))),
        None => {
            tracing::info!(
                "FLY_APP_NAME not set, every customer resolves to machine {:?}",
                LOCAL_MACHINE_ID
            );
            Ok(Arc::new(LocalResolver))
        }
    }
}
