//! Trait seams behind which collaborators and scoring variants live.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{BackendError, EmbedError, ReadError};
use crate::types::{BackendKind, Chunk, ContentType, RemoteHit, ScoredChunk};

/// Turns text into embedding vectors.
///
/// Implementations must return one vector per input, all of dimension
/// [`Embedder::dimension`], in input order. Anything else is a provider
/// malfunction and must fail the whole call.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Provider model identifier, for logging and stats.
    fn model_name(&self) -> &str;

    /// Dimension of every vector this embedder produces.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embed a single query string.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut vectors = self.embed(&[text]).await?;
        vectors.pop().ok_or(EmbedError::Malformed {
            expected: 1,
            got: 0,
        })
    }
}

/// Decodes a source file into plain text.
///
/// The engine never parses file bytes itself. A source that yields no text
/// is reported as [`ReadError::Unreadable`]; the caller turns that into a
/// structured ingest failure, not a raised error.
pub trait FileReader: Send + Sync {
    fn read(&self, path: &Path, content_type: ContentType) -> Result<String, ReadError>;
}

/// External managed vector store. Embeds and ranks server-side; tenants
/// map to namespaces.
///
/// The write path (upsert, delete) and the read path (query) go through
/// the same seam so store and namespace state stay paired: whoever clears
/// a tenant drops the namespace through this trait as well.
#[async_trait]
pub trait RemoteIndex: Send + Sync {
    /// Upsert `(id, text)` records into the tenant's namespace.
    async fn upsert(&self, tenant: &str, records: &[(u64, &str)]) -> Result<(), BackendError>;

    /// Rank the tenant's namespace against `text`, returning at most
    /// `top_k` matches.
    async fn query(
        &self,
        tenant: &str,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<RemoteHit>, BackendError>;

    /// Drop the tenant's namespace and everything in it.
    async fn delete_namespace(&self, tenant: &str) -> Result<(), BackendError>;
}

/// Scores a tenant's chunks against a query string.
///
/// Each variant produces scores on its own scale; callers must not compare
/// scores across backends. Implementations score every candidate they are
/// given and never return a partial ranking.
#[async_trait]
pub trait SimilarityBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Score `chunks` against `query`. Returns one entry per chunk, in any
    /// order; the engine sorts.
    async fn score(
        &self,
        tenant: &str,
        query: &str,
        chunks: &[Chunk],
    ) -> Result<Vec<ScoredChunk>, BackendError>;
}
