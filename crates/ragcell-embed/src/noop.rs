//! No-op embedder for tests and development builds.

use async_trait::async_trait;
use ragcell_core::{EmbedError, Embedder};

/// Embedder that returns zero-vectors without touching the network.
///
/// Useful for exercising the ingest and store paths when no embedding
/// provider is reachable. All vectors are identical, so rankings produced
/// with it are meaningless.
pub struct NoopEmbedder {
    dimension: usize,
}

impl NoopEmbedder {
    /// Create with the default dimension (1536).
    #[must_use]
    pub fn new() -> Self {
        Self { dimension: 1536 }
    }

    /// Create with a custom dimension.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for NoopEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for NoopEmbedder {
    fn model_name(&self) -> &str {
        "noop"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|_| vec![0.0; self.dimension]).collect())
    }
}
