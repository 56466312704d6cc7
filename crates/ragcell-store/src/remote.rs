//! Client for an external managed vector store.
//!
//! The remote store accepts raw text and handles embedding server-side, so
//! the local engine never sees vectors in this mode. Tenants map to
//! namespaces. The wire protocol is a small JSON surface:
//!
//! - `POST {base}/namespaces/{tenant}/upsert` with `{"records": [...]}`
//! - `POST {base}/namespaces/{tenant}/query` with `{"text", "top_k"}`,
//!   returning `{"matches": [{"id", "score"}, ...]}`
//! - `DELETE {base}/namespaces/{tenant}`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use ragcell_core::{BackendError, RemoteHit, RemoteIndex};

/// Default hard deadline for one remote store round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the managed vector store.
#[derive(Debug, Clone)]
pub struct RemoteVectorStoreConfig {
    /// Base URL of the service
    pub endpoint: String,
    /// Bearer token; empty means no auth header
    pub api_key: String,
    /// Per-request deadline
    pub timeout: Duration,
}

impl Default for RemoteVectorStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9090".to_string(),
            api_key: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct UpsertRecord<'a> {
    id: String,
    text: &'a str,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    records: Vec<UpsertRecord<'a>>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    text: &'a str,
    top_k: usize,
}

#[derive(Deserialize)]
struct QueryResponse {
    matches: Vec<RemoteHit>,
}

/// HTTP client for the managed vector store.
pub struct RemoteVectorStore {
    config: RemoteVectorStoreConfig,
    client: reqwest::Client,
}

impl RemoteVectorStore {
    pub fn new(config: RemoteVectorStoreConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::Remote(format!("client build failed: {e}")))?;
        Ok(Self { config, client })
    }

    fn url(&self, tenant: &str, suffix: &str) -> String {
        format!(
            "{}/namespaces/{tenant}{suffix}",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.api_key.is_empty() {
            req
        } else {
            req.header("Authorization", format!("Bearer {}", self.config.api_key))
        }
    }

    fn map_send_error(e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Remote(format!("request failed: {e}"))
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "remote store returned error");
            Err(BackendError::Remote(format!("HTTP {status}: {body}")))
        }
    }
}

#[async_trait]
impl RemoteIndex for RemoteVectorStore {
    async fn upsert(&self, tenant: &str, records: &[(u64, &str)]) -> Result<(), BackendError> {
        if records.is_empty() {
            return Ok(());
        }

        let request = UpsertRequest {
            records: records
                .iter()
                .map(|(id, text)| UpsertRecord {
                    id: id.to_string(),
                    text,
                })
                .collect(),
        };

        debug!(tenant, count = records.len(), "remote upsert");
        let response = self
            .apply_auth(self.client.post(self.url(tenant, "/upsert")))
            .json(&request)
            .send()
            .await
            .map_err(Self::map_send_error)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn query(
        &self,
        tenant: &str,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<RemoteHit>, BackendError> {
        let response = self
            .apply_auth(self.client.post(self.url(tenant, "/query")))
            .json(&QueryRequest { text, top_k })
            .send()
            .await
            .map_err(Self::map_send_error)?;
        let parsed: QueryResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Remote(format!("invalid response body: {e}")))?;
        Ok(parsed.matches)
    }

    async fn delete_namespace(&self, tenant: &str) -> Result<(), BackendError> {
        debug!(tenant, "remote namespace delete");
        let response = self
            .apply_auth(self.client.delete(self.url(tenant, "")))
            .send()
            .await
            .map_err(Self::map_send_error)?;
        Self::check(response).await?;
        Ok(())
    }
}
