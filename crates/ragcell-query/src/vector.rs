//! Embedding-distance scoring over the flat exact index.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use ragcell_core::{BackendError, BackendKind, Chunk, DistanceMetric, ScoredChunk, SimilarityBackend};
use ragcell_embed::EmbedderPool;
use ragcell_store::DocumentStore;

/// Embeds the query and scores it against every indexed chunk.
///
/// Chunks without embeddings are skipped; in vector mode the ingest
/// pipeline embeds everything, so the skip only matters for tenants mixed
/// across modes.
pub struct VectorBackend {
    pool: Arc<EmbedderPool>,
    store: Arc<DocumentStore>,
    metric: DistanceMetric,
}

impl VectorBackend {
    pub fn new(pool: Arc<EmbedderPool>, store: Arc<DocumentStore>, metric: DistanceMetric) -> Self {
        Self {
            pool,
            store,
            metric,
        }
    }
}

#[async_trait]
impl SimilarityBackend for VectorBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Vector
    }

    async fn score(
        &self,
        tenant: &str,
        query: &str,
        _chunks: &[Chunk],
    ) -> Result<Vec<ScoredChunk>, BackendError> {
        let query_vector = self.pool.embed_query(query).await?;
        let scored = self
            .store
            .score_vectors(tenant, &query_vector, self.metric)
            .await?;
        debug!(tenant, candidates = scored.len(), metric = ?self.metric, "vector scoring");
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ragcell_core::{ChunkMetadata, ContentType, EmbedError, Embedder};
    use ragcell_store::NewChunk;

    // maps "x"/"y" to unit axis vectors so rankings are predictable
    struct AxisEmbedder;

    #[async_trait]
    impl Embedder for AxisEmbedder {
        fn model_name(&self) -> &str {
            "axis"
        }

        fn dimension(&self) -> usize {
            2
        }

        async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Ok(texts
                .iter()
                .map(|t| {
                    if t.contains('x') {
                        vec![1.0, 0.0]
                    } else {
                        vec![0.0, 1.0]
                    }
                })
                .collect())
        }
    }

    fn entry(text: &str, embedding: Vec<f32>) -> NewChunk {
        NewChunk {
            text: text.to_string(),
            metadata: ChunkMetadata {
                source: "t.txt".to_string(),
                content_type: ContentType::Text,
                uploaded_at: Utc::now(),
                word_count: 1,
            },
            embedding: Some(embedding),
        }
    }

    #[tokio::test]
    async fn ranks_by_cosine_against_the_index() {
        let store = Arc::new(DocumentStore::new());
        store
            .append(
                "alice",
                vec![
                    entry("about y", vec![0.0, 1.0]),
                    entry("about x", vec![1.0, 0.0]),
                ],
            )
            .await
            .unwrap();

        let pool = Arc::new(EmbedderPool::new(Arc::new(AxisEmbedder), 2));
        let backend = VectorBackend::new(pool, Arc::clone(&store), DistanceMetric::Cosine);

        let scored = backend.score("alice", "x please", &[]).await.unwrap();
        assert_eq!(scored.len(), 2);
        let best = scored
            .iter()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap())
            .unwrap();
        assert_eq!(best.id, 1);
    }

    #[tokio::test]
    async fn query_dimension_mismatch_surfaces_as_store_error() {
        let store = Arc::new(DocumentStore::new());
        store
            .append("alice", vec![entry("3d", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap();

        let pool = Arc::new(EmbedderPool::new(Arc::new(AxisEmbedder), 2));
        let backend = VectorBackend::new(pool, store, DistanceMetric::Cosine);

        let err = backend.score("alice", "x", &[]).await.unwrap_err();
        assert!(matches!(err, BackendError::Store(_)));
        assert!(!err.is_retryable());
    }
}
