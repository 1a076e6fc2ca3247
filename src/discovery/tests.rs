//! Discovery Module Tests
//!
//! ## Test Scopes
//! - **Hostnames**: Discovery hostname format and machine id extraction.
//! - **DnsMachineResolver**: Forward/reverse chaining against a fake name service,
//!   including every failure path resolving to "no machine".
//! - **LocalResolver**: Placeholder resolution without any lookup.

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::discovery::dns::NameService;
    use crate::discovery::resolver::{
        DnsMachineResolver, LOCAL_MACHINE_ID, LocalResolver, MachineResolver,
        discovery_hostname, machine_id_from_hostname, resolver_from_config,
    };
    use crate::discovery::types::{LookupError, MachineId};

    use async_trait::async_trait;
    use dashmap::DashMap;
    use std::net::IpAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeNameService {
        forward: DashMap<String, IpAddr>,
        reverse: DashMap<IpAddr, String>,
        broken: bool,
        lookups: AtomicUsize,
    }

    impl FakeNameService {
        fn with_machine(host: &str, addr: &str, ptr: &str) -> Self {
            let fake = Self::default();
            let addr: IpAddr = addr.parse().unwrap();
            fake.forward.insert(host.to_string(), addr);
            fake.reverse.insert(addr, ptr.to_string());
            fake
        }
    }

    #[async_trait]
    impl NameService for FakeNameService {
        async fn lookup_addr(&self, host: &str) -> Result<IpAddr, LookupError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(LookupError::Transport("timed out".to_string()));
            }
            self.forward
                .get(host)
                .map(|entry| *entry.value())
                .ok_or(LookupError::NoRecords)
        }

        async fn reverse_lookup(&self, addr: IpAddr) -> Result<String, LookupError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.reverse
                .get(&addr)
                .map(|entry| entry.value().clone())
                .ok_or(LookupError::NoRecords)
        }
    }

    // ============================================================
    // HOSTNAME TESTS
    // ============================================================

    #[test]
    fn test_discovery_hostname_format() {
        assert_eq!(
            discovery_hostname("42", "tenants"),
            "customer42.process.tenants.internal"
        );
    }

    #[test]
    fn test_machine_id_is_leading_label() {
        assert_eq!(
            machine_id_from_hostname("148e21ea7e4189.vm.tenants.internal."),
            Some(MachineId("148e21ea7e4189".to_string()))
        );
        assert_eq!(
            machine_id_from_hostname("solo"),
            Some(MachineId("solo".to_string()))
        );
        assert_eq!(machine_id_from_hostname(""), None);
        assert_eq!(machine_id_from_hostname(".vm.internal"), None);
    }

    // ============================================================
    // DNS RESOLVER TESTS
    // ============================================================

    #[tokio::test]
    async fn test_resolves_forward_then_reverse() {
        // ARRANGE
        let fake = FakeNameService::with_machine(
            "customer42.process.tenants.internal",
            "fdaa:0:1::3",
            "3d8d9e1c.vm.tenants.internal.",
        );
        let resolver = DnsMachineResolver::new("tenants", fake);

        // ACT
        let machine = resolver.resolve("42").await;

        // ASSERT
        assert_eq!(machine, Some(MachineId("3d8d9e1c".to_string())));
        assert_eq!(resolver.name_service().lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_forward_record_is_absent() {
        let fake = FakeNameService::with_machine(
            "customer42.process.tenants.internal",
            "fdaa:0:1::3",
            "3d8d9e1c.vm.tenants.internal.",
        );
        let resolver = DnsMachineResolver::new("tenants", fake);

        assert_eq!(resolver.resolve("99").await, None);
        // The reverse step never runs
        assert_eq!(resolver.name_service().lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_reverse_record_is_absent() {
        let fake = FakeNameService::default();
        fake.forward.insert(
            "customer5.process.tenants.internal".to_string(),
            "10.0.0.5".parse().unwrap(),
        );
        let resolver = DnsMachineResolver::new("tenants", fake);

        assert_eq!(resolver.resolve("5").await, None);
    }

    #[tokio::test]
    async fn test_transport_failure_is_absent() {
        let fake = FakeNameService {
            broken: true,
            ..FakeNameService::default()
        };
        let resolver = DnsMachineResolver::new("tenants", fake);

        assert_eq!(resolver.resolve("42").await, None);
    }

    #[tokio::test]
    async fn test_malformed_customer_id_skips_lookup() {
        let resolver = DnsMachineResolver::new("tenants", FakeNameService::default());

        assert_eq!(resolver.resolve("a.b").await, None);
        assert_eq!(resolver.resolve("").await, None);
        assert_eq!(resolver.resolve(&"9".repeat(64)).await, None);
        assert_eq!(resolver.name_service().lookups.load(Ordering::SeqCst), 0);
    }

    // ============================================================
    // LOCAL RESOLVER TESTS
    // ============================================================

    #[tokio::test]
    async fn test_local_resolver_returns_placeholder() {
        for id in ["0", "42", "anything"] {
            assert_eq!(
                LocalResolver.resolve(id).await,
                Some(MachineId(LOCAL_MACHINE_ID.to_string()))
            );
        }
    }

    #[tokio::test]
    async fn test_unset_app_name_selects_placeholder_resolution() {
        let config = Config::from_lookup(|_| None).unwrap();
        let resolver = resolver_from_config(&config).unwrap();

        assert_eq!(
            resolver.resolve("123").await,
            Some(MachineId(LOCAL_MACHINE_ID.to_string()))
        );
    }
}
