//! Scoring delegated to the external managed vector store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use ragcell_core::{BackendError, BackendKind, Chunk, RemoteIndex, ScoredChunk, SimilarityBackend};

/// Asks the remote store to rank the tenant's namespace.
///
/// The remote service embeds and scores server-side. It is asked for as
/// many matches as there are local chunks; local chunks absent from its
/// response score 0.0, so the ranking still covers every candidate.
pub struct RemoteBackend {
    remote: Arc<dyn RemoteIndex>,
}

impl RemoteBackend {
    pub fn new(remote: Arc<dyn RemoteIndex>) -> Self {
        Self { remote }
    }
}

#[async_trait]
impl SimilarityBackend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn score(
        &self,
        tenant: &str,
        query: &str,
        chunks: &[Chunk],
    ) -> Result<Vec<ScoredChunk>, BackendError> {
        let matches = self.remote.query(tenant, query, chunks.len()).await?;
        debug!(tenant, matches = matches.len(), "remote scoring");

        let mut by_id: HashMap<u64, f32> = HashMap::with_capacity(matches.len());
        for m in matches {
            match m.id.parse::<u64>() {
                Ok(id) => {
                    by_id.insert(id, m.score);
                }
                Err(_) => warn!(tenant, id = %m.id, "remote match id is not numeric, skipping"),
            }
        }

        Ok(chunks
            .iter()
            .map(|chunk| ScoredChunk {
                id: chunk.id,
                score: by_id.get(&chunk.id).copied().unwrap_or(0.0),
            })
            .collect())
    }
}
