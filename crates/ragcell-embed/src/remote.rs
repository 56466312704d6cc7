//! OpenAI-compatible embedding provider client.
//!
//! Talks to any `/embeddings` endpoint that accepts
//! `{"model": ..., "input": [...]}` and returns
//! `{"data": [{"embedding": [...], "index": n}, ...]}`. Responses are
//! validated strictly: wrong vector count or wrong dimension fails the whole
//! call, nothing is salvaged from a malformed batch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use ragcell_core::{EmbedError, Embedder};

/// Default hard deadline for one provider round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the embedding provider.
#[derive(Debug, Clone)]
pub struct RemoteEmbedderConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`
    pub endpoint: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Bearer token; empty means no auth header
    pub api_key: String,
    /// Dimension every returned vector must have
    pub dimension: usize,
    /// Per-request deadline
    pub timeout: Duration,
}

impl Default for RemoteEmbedderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            api_key: String::new(),
            dimension: 1536,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
    index: usize,
}

/// HTTP client for an OpenAI-compatible embedding endpoint.
pub struct RemoteEmbedder {
    config: RemoteEmbedderConfig,
    client: reqwest::Client,
}

impl RemoteEmbedder {
    pub fn new(config: RemoteEmbedderConfig) -> Result<Self, EmbedError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbedError::Provider(format!("client build failed: {e}")))?;
        Ok(Self { config, client })
    }

    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.config.endpoint.trim_end_matches('/'))
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.api_key.is_empty() {
            req
        } else {
            req.header("Authorization", format!("Bearer {}", self.config.api_key))
        }
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        debug!(count = texts.len(), model = %self.config.model, "embedding batch");

        let response = self
            .apply_auth(self.client.post(self.embeddings_url()))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbedError::Timeout
                } else {
                    EmbedError::Provider(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "embedding provider returned error");
            return Err(EmbedError::Provider(format!("HTTP {status}: {body}")));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::Provider(format!("invalid response body: {e}")))?;

        if parsed.data.len() != texts.len() {
            return Err(EmbedError::Malformed {
                expected: texts.len(),
                got: parsed.data.len(),
            });
        }

        // Providers may reorder; the index field restores input order.
        let mut vectors: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        for datum in parsed.data {
            if datum.embedding.len() != self.config.dimension {
                return Err(EmbedError::Provider(format!(
                    "vector dimension {} does not match configured {}",
                    datum.embedding.len(),
                    self.config.dimension
                )));
            }
            match vectors.get_mut(datum.index) {
                Some(slot) => *slot = Some(datum.embedding),
                None => {
                    return Err(EmbedError::Provider(format!(
                        "out of range index {} in response",
                        datum.index
                    )))
                }
            }
        }

        vectors
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(EmbedError::Malformed {
                expected: texts.len(),
                got: 0,
            })
    }
}
