use super::types::LookupError;

use anyhow::Result;
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use std::net::IpAddr;

/// The two name-service queries discovery needs.
#[async_trait]
pub trait NameService: Send + Sync {
    /// Forward lookup: first address record for `host`.
    async fn lookup_addr(&self, host: &str) -> Result<IpAddr, LookupError>;

    /// Reverse lookup: first hostname pointing back at `addr`.
    async fn reverse_lookup(&self, addr: IpAddr) -> Result<String, LookupError>;
}

/// `NameService` backed by the system resolver configuration.
pub struct HickoryNameService {
    resolver: TokioAsyncResolver,
}

impl HickoryNameService {
    pub fn from_system_conf() -> Result<Self> {
        Ok(Self {
            resolver: TokioAsyncResolver::tokio_from_system_conf()?,
        })
    }
}

fn classify(err: ResolveError) -> LookupError {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => LookupError::NoRecords,
        _ => LookupError::Transport(err.to_string()),
    }
}

#[async_trait]
impl NameService for HickoryNameService {
    async fn lookup_addr(&self, host: &str) -> Result<IpAddr, LookupError> {
        let lookup = self.resolver.lookup_ip(host).await.map_err(classify)?;
        lookup.iter().next().ok_or(LookupError::NoRecords)
    }

    async fn reverse_lookup(&self, addr: IpAddr) -> Result<String, LookupError> {
        let lookup = self.resolver.reverse_lookup(addr).await.map_err(classify)?;
        lookup
            .iter()
            .next()
            .map(|ptr| ptr.to_string())
            .ok_or(LookupError::NoRecords)
    }
}
