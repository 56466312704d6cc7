//! The query engine: pre-filter, score, rank, clamp, truncate.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use ragcell_core::{
    BackendError, Chunk, Error, QueryOutcome, Result, ScoredChunk, SimilarityBackend,
};
use ragcell_store::DocumentStore;

use crate::prefilter::{PrefilterConfig, PrefilterDecision};

/// Hard deadline for one backend scoring pass.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs queries against one tenant's corpus through the configured backend.
///
/// The engine holds the ranking invariants: results are sorted by
/// descending score with ties broken by ascending chunk id, `top_k` is
/// clamped to the corpus size, and a deadline miss discards every partial
/// score rather than returning a truncated ranking.
pub struct QueryEngine {
    store: Arc<DocumentStore>,
    backend: Arc<dyn SimilarityBackend>,
    prefilter: PrefilterConfig,
    timeout: Duration,
}

impl QueryEngine {
    pub fn new(
        store: Arc<DocumentStore>,
        backend: Arc<dyn SimilarityBackend>,
        prefilter: PrefilterConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            backend,
            prefilter,
            timeout,
        }
    }

    /// Rank a tenant's chunks against `query` and return the top `top_k`.
    ///
    /// Unknown tenants and empty corpora yield the empty result, never an
    /// error.
    pub async fn query(&self, tenant: &str, query: &str, top_k: usize) -> Result<QueryOutcome> {
        let chunks = self.store.chunks(tenant).await;
        if chunks.is_empty() {
            debug!(tenant, "no chunks, empty result");
            return Ok(QueryOutcome::empty());
        }

        match self.prefilter.evaluate(query) {
            PrefilterDecision::Conversational => {
                debug!(tenant, "conversational query short-circuited");
                return Ok(QueryOutcome::empty());
            }
            PrefilterDecision::FullContext => {
                // every chunk, unranked, in id order; top_k does not apply
                info!(tenant, chunks = chunks.len(), "full context response");
                return Ok(QueryOutcome::from_ranked(chunks.iter().map(|c| (c, 0.0))));
            }
            PrefilterDecision::Proceed => {}
        }

        let top_k = top_k.min(chunks.len());
        if top_k == 0 {
            return Ok(QueryOutcome::empty());
        }

        let scored = match tokio::time::timeout(
            self.timeout,
            self.backend.score(tenant, query, &chunks),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(tenant, timeout = ?self.timeout, "scoring deadline missed");
                return Err(Error::Backend(BackendError::Timeout));
            }
        };

        Ok(rank(&chunks, scored, top_k))
    }

    pub fn backend_kind(&self) -> ragcell_core::BackendKind {
        self.backend.kind()
    }
}

/// Sort scored candidates and assemble the result arrays.
///
/// Candidates whose id is not in the chunk snapshot are dropped before the
/// cut, so they never consume a result slot.
fn rank(chunks: &[Chunk], scored: Vec<ScoredChunk>, top_k: usize) -> QueryOutcome {
    let by_id: HashMap<u64, &Chunk> = chunks.iter().map(|c| (c.id, c)).collect();

    let mut scored: Vec<ScoredChunk> = scored
        .into_iter()
        .filter(|s| by_id.contains_key(&s.id))
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    scored.truncate(top_k);

    QueryOutcome::from_ranked(
        scored
            .iter()
            .filter_map(|s| by_id.get(&s.id).map(|c| (*c, s.score))),
    )
}
