//! AWS Signature Version 4
//!
//! Header-based request signing for S3-compatible object stores. Only the
//! headers the client actually sends are signed: `host`,
//! `x-amz-content-sha256` and `x-amz-date`. Query strings are never used.

use super::types::StoreError;
use crate::config::S3Credentials;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const SERVICE: &str = "s3";
pub const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// Headers to attach to a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub amz_date: String,
    pub content_sha256: String,
    pub authorization: String,
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, StoreError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| StoreError::Backend(format!("invalid signing key: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derives the per-day, per-region, per-service signing key.
pub fn derive_signing_key(
    secret_access_key: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, StoreError> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_access_key).as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

/// Percent-encodes `input` per the SigV4 rules. `/` is kept when
/// `keep_slash` is set, as required for object key paths.
pub fn uri_encode(input: &str, keep_slash: bool) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            b'/' if keep_slash => encoded.push('/'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

fn host_header(url: &reqwest::Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

pub fn canonical_request(
    method: &str,
    url: &reqwest::Url,
    amz_date: &str,
    content_sha256: &str,
) -> String {
    format!(
        "{}\n{}\n\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n\n{}\n{}",
        method,
        url.path(),
        host_header(url),
        content_sha256,
        amz_date,
        SIGNED_HEADERS,
        content_sha256
    )
}

/// Signs a request whose path is already SigV4-encoded.
pub fn sign_request(
    method: &str,
    url: &reqwest::Url,
    payload: &[u8],
    credentials: &S3Credentials,
    region: &str,
    now: DateTime<Utc>,
) -> Result<SignedHeaders, StoreError> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let content_sha256 = sha256_hex(payload);

    let scope = format!("{}/{}/{}/aws4_request", date, region, SERVICE);
    let request = canonical_request(method, url, &amz_date, &content_sha256);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        sha256_hex(request.as_bytes())
    );

    let signing_key = derive_signing_key(&credentials.secret_access_key, &date, region, SERVICE)?;
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

    Ok(SignedHeaders {
        authorization: format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, credentials.access_key_id, scope, SIGNED_HEADERS, signature
        ),
        amz_date,
        content_sha256,
    })
}
