//! Process Configuration
//!
//! Everything the node needs is read from the environment once at startup and
//! passed down explicitly. Optional variables treat an empty value as unset.

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_PATH: &str = "./db.sqlite3";
pub const DEFAULT_CUSTOMER_ID: &str = "0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_S3_ENDPOINT: &str = "https://fly.storage.tigris.dev";
pub const DEFAULT_S3_REGION: &str = "auto";

#[derive(Clone, PartialEq, Eq)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Local state file mirroring the tenant's durable blob.
    pub database_path: PathBuf,
    /// Durable Store bucket. `None` runs the node without synchronization.
    pub bucket_name: Option<String>,
    /// Tenant served locally by this process.
    pub customer_id: String,
    /// Application identifier used for discovery. `None` means local/dev mode.
    pub app_name: Option<String>,
    pub machine_id: Option<String>,
    pub reset_db: bool,
    pub port: u16,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_credentials: Option<S3Credentials>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let port = match optional("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        let s3_credentials = match (
            optional("AWS_ACCESS_KEY_ID"),
            optional("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(S3Credentials {
                access_key_id,
                secret_access_key,
            }),
            _ => None,
        };

        let customer_id =
            optional("CUSTOMER_ID").unwrap_or_else(|| DEFAULT_CUSTOMER_ID.to_string());
        validate_customer_id(&customer_id)?;

        Ok(Self {
            database_path: PathBuf::from(
                optional("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            ),
            bucket_name: optional("BUCKET_NAME"),
            customer_id,
            app_name: optional("FLY_APP_NAME"),
            machine_id: optional("FLY_MACHINE_ID"),
            // Presence alone requests a reset, even `RESET_DB=`.
            reset_db: lookup("RESET_DB").is_some(),
            port,
            s3_endpoint: optional("AWS_ENDPOINT_URL_S3")
                .unwrap_or_else(|| DEFAULT_S3_ENDPOINT.to_string()),
            s3_region: optional("AWS_REGION").unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
            s3_credentials,
        })
    }
}

/// The customer id becomes one segment of the durable key, so it may not
/// contain separators or be a dot segment that URL normalization would fold.
fn validate_customer_id(customer_id: &str) -> Result<()> {
    if customer_id.contains(['/', '\\'])
        || customer_id.chars().any(char::is_control)
        || customer_id.chars().all(|c| c == '.')
    {
        anyhow::bail!("CUSTOMER_ID {:?} cannot be used as a key segment", customer_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database_path, PathBuf::from("./db.sqlite3"));
        assert_eq!(config.customer_id, "0");
        assert_eq!(config.port, 3000);
        assert!(config.bucket_name.is_none());
        assert!(config.app_name.is_none());
        assert!(!config.reset_db);
        assert!(config.s3_credentials.is_none());
        assert_eq!(config.s3_region, "auto");
    }

    #[test]
    fn test_reads_recognized_options() {
        let config = config_from(&[
            ("DATABASE_PATH", "/data/db.sqlite3"),
            ("BUCKET_NAME", "b"),
            ("CUSTOMER_ID", "42"),
            ("FLY_APP_NAME", "tenants"),
            ("PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/data/db.sqlite3"));
        assert_eq!(config.bucket_name.as_deref(), Some("b"));
        assert_eq!(config.customer_id, "42");
        assert_eq!(config.app_name.as_deref(), Some("tenants"));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_reset_db_presence_is_enough() {
        let config = config_from(&[("RESET_DB", "")]).unwrap();
        assert!(config.reset_db);
    }

    #[test]
    fn test_empty_app_name_means_local_mode() {
        let config = config_from(&[("FLY_APP_NAME", "")]).unwrap();
        assert!(config.app_name.is_none());
    }

    #[test]
    fn test_credentials_need_both_halves() {
        let partial = config_from(&[("AWS_ACCESS_KEY_ID", "AKID")]).unwrap();
        assert!(partial.s3_credentials.is_none());

        let full = config_from(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(
            full.s3_credentials,
            Some(S3Credentials {
                access_key_id: "AKID".to_string(),
                secret_access_key: "secret".to_string(),
            })
        );
    }

    #[test]
    fn test_debug_output_hides_secret() {
        let config = config_from(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "super-secret"),
        ])
        .unwrap();

        let rendered = format!("{:?}", config);
        assert!(rendered.contains("AKID"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_customer_id_must_stay_inside_its_key() {
        for bad in ["..", ".", "a/b", "..\\x", "4\n2"] {
            assert!(
                config_from(&[("CUSTOMER_ID", bad)]).is_err(),
                "{:?} should be rejected",
                bad
            );
        }

        let dotted = config_from(&[("CUSTOMER_ID", "v1.2")]).unwrap();
        assert_eq!(dotted.customer_id, "v1.2");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(config_from(&[("PORT", "http")]).is_err());
    }
}
