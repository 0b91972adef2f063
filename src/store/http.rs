//! HTTP object store binding
//!
//! Speaks the S3-compatible REST surface: `PUT {endpoint}/{bucket}/{key}`
//! with an optional bearer token. Works against MinIO-style gateways and
//! anything else exposing path-style puts.

use crate::store::ObjectStore;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Object store client over plain HTTP puts
pub struct HttpObjectStore {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpObjectStore {
    /// Creates a store client for the given endpoint
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL of the store gateway (no trailing slash needed)
    /// * `token` - Optional bearer token attached to every request
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> StoreResult<()> {
        let url = format!("{}/{}/{}", self.endpoint, bucket, key);

        let mut request = self.client.put(&url).body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| StoreError::Upload {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Upload {
                key: key.to_string(),
                message: format!("HTTP {}: {}", status, body.chars().take(200).collect::<String>()),
            });
        }

        tracing::debug!("Uploaded {} to {}", key, bucket);
        Ok(())
    }
}
