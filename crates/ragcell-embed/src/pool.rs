//! Embedder pool bounding concurrent provider calls.

use ragcell_core::{EmbedError, Embedder};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Wraps an [`Embedder`] with a semaphore limiting in-flight requests.
pub struct EmbedderPool {
    embedder: Arc<dyn Embedder>,
    semaphore: Semaphore,
    max_concurrent: usize,
}

impl EmbedderPool {
    pub fn new(embedder: Arc<dyn Embedder>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            embedder,
            semaphore: Semaphore::new(max_concurrent),
            max_concurrent,
        }
    }

    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Embed a batch of texts, waiting for a permit first.
    pub async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| EmbedError::Provider(format!("semaphore error: {e}")))?;

        self.embedder.embed(texts).await
    }

    /// Embed a single query string.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbedError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| EmbedError::Provider(format!("semaphore error: {e}")))?;

        self.embedder.embed_query(query).await
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}
