use super::client::DurableStore;
use super::signing::{sign_request, uri_encode};
use super::types::StoreError;
use crate::config::{Config, S3Credentials};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, StatusCode};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `DurableStore` speaking the S3 object API with path-style addressing.
///
/// Requests are signed with SigV4 when credentials are configured and sent
/// unsigned otherwise (e.g. a local emulator with anonymous access).
pub struct S3Store {
    http_client: reqwest::Client,
    endpoint: String,
    bucket: String,
    region: String,
    credentials: Option<S3Credentials>,
    timeout: Duration,
}

impl S3Store {
    pub fn new(
        endpoint: &str,
        bucket: &str,
        region: &str,
        credentials: Option<S3Credentials>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            region: region.to_string(),
            credentials,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let bucket = config
            .bucket_name
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("BUCKET_NAME is not configured"))?;

        Ok(Self::new(
            &config.s3_endpoint,
            bucket,
            &config.s3_region,
            config.s3_credentials.clone(),
        ))
    }

    /// URL of the object backing `key`. The leading slash of the key is dropped.
    pub fn object_url(&self, key: &str) -> Result<reqwest::Url, StoreError> {
        let object = uri_encode(key.trim_start_matches('/'), true);
        let raw = format!(
            "{}/{}/{}",
            self.endpoint,
            uri_encode(&self.bucket, false),
            object
        );
        reqwest::Url::parse(&raw)
            .map_err(|e| StoreError::Backend(format!("invalid object url {}: {}", raw, e)))
    }

    async fn send(
        &self,
        method: Method,
        key: &str,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, StoreError> {
        let url = self.object_url(key)?;
        let payload = body.unwrap_or_default();

        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .timeout(self.timeout);

        if let Some(credentials) = &self.credentials {
            let signed = sign_request(
                method.as_str(),
                &url,
                &payload,
                credentials,
                &self.region,
                Utc::now(),
            )?;
            request = request
                .header("x-amz-date", signed.amz_date)
                .header("x-amz-content-sha256", signed.content_sha256)
                .header(reqwest::header::AUTHORIZATION, signed.authorization);
        }

        if method == Method::PUT {
            request = request.body(payload);
        }

        tracing::debug!("{} {}", method, url);
        Ok(request.send().await?)
    }
}

#[async_trait]
impl DurableStore for S3Store {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let response = self.send(Method::GET, key, None).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !response.status().is_success() {
            return Err(StoreError::Backend(format!(
                "GET {} failed {}",
                key,
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let response = self.send(Method::PUT, key, Some(bytes)).await?;

        if !response.status().is_success() {
            return Err(StoreError::Backend(format!(
                "PUT {} failed {}",
                key,
                response.status()
            )));
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let response = self.send(Method::DELETE, key, None).await?;
        let status = response.status();

        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }

        Err(StoreError::Backend(format!("DELETE {} failed {}", key, status)))
    }
}
