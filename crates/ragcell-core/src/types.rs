//! Shared data structures for the retrieval engine.
//!
//! ## Documents
//! - [`Chunk`]: a slice of ingested text with metadata and optional embedding
//! - [`ChunkMetadata`]: source information shared by all chunks of one ingest
//! - [`ContentType`]: declared format of the ingested source
//!
//! ## Results
//! - [`IngestOutcome`]: structured ingest result (never an `Err` at the boundary)
//! - [`QueryOutcome`]: parallel arrays of ids/scores/metadata/documents
//! - [`ScoredChunk`]: one `(chunk id, score)` pair produced by a backend
//!
//! ## Configuration vocabulary
//! - [`BackendKind`]: which similarity backend is active
//! - [`DistanceMetric`]: vector comparison used by the flat index

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tenant used when a request does not name one.
pub const DEFAULT_TENANT: &str = "default";

/// Declared format of an ingested source.
///
/// The engine never parses file bytes itself; the file-reading collaborator
/// decodes them to text first. The content type is carried as metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Docx,
    Pdf,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Text => write!(f, "text"),
            ContentType::Docx => write!(f, "docx"),
            ContentType::Pdf => write!(f, "pdf"),
        }
    }
}

/// Metadata shared by all chunks produced from one ingest call.
///
/// `word_count` is computed once over the whole document rather than per
/// chunk; every chunk of the document carries the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Where the text came from (file path or caller-supplied label)
    pub source: String,
    /// Declared format of the source
    pub content_type: ContentType,
    /// When the document was ingested
    pub uploaded_at: DateTime<Utc>,
    /// Whitespace-separated word count of the whole document
    pub word_count: usize,
}

/// A fixed-size slice of ingested text; the unit of indexing and ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique within a tenant, contiguous from 0, insertion-ordered
    pub id: u64,
    /// The chunk text
    pub text: String,
    /// Metadata of the ingest call that produced this chunk
    pub metadata: ChunkMetadata,
    /// Embedding vector (present only in vector mode)
    pub embedding: Option<Vec<f32>>,
}

/// One scored candidate produced by a [`SimilarityBackend`].
///
/// Scores are higher-is-better and only comparable within a single backend
/// variant.
///
/// [`SimilarityBackend`]: crate::traits::SimilarityBackend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredChunk {
    pub id: u64,
    pub score: f32,
}

/// One scored match returned by the external managed vector store.
///
/// Ids come back as strings on the wire; callers map them onto local chunk
/// ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteHit {
    pub id: String,
    pub score: f32,
}

/// The active similarity backend, chosen once at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Token overlap + character sequence similarity, no embeddings
    #[default]
    Lexical,
    /// Embedding distance over the flat exact index
    Vector,
    /// Delegation to an external managed vector store
    Remote,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Lexical => write!(f, "lexical"),
            BackendKind::Vector => write!(f, "vector"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

/// Vector comparison used by the flat index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Dot,
}

/// Structured result of one ingest call.
///
/// Ingestion failures are reported here rather than raised: an unreadable or
/// empty document yields `count: 0` with `error` set, and an embedding
/// failure aborts the whole call with no partial append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// Number of chunks appended
    pub count: usize,
    /// Ids of the appended chunks, rendered as strings
    pub ids: Vec<String>,
    /// Failure description, if the call appended nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestOutcome {
    /// Outcome for a successful append.
    pub fn appended(ids: Vec<u64>) -> Self {
        Self {
            count: ids.len(),
            ids: ids.iter().map(u64::to_string).collect(),
            error: None,
        }
    }

    /// Outcome for a call that appended nothing.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            count: 0,
            ids: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Query result: four parallel arrays, always equal length, ordered by
/// descending score with ties broken by ascending chunk id.
///
/// `distances` holds similarity scores (higher is better), not metric
/// distances; the field name is kept for interface compatibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub ids: Vec<String>,
    pub distances: Vec<f32>,
    pub metadatas: Vec<ChunkMetadata>,
    pub documents: Vec<String>,
}

impl QueryOutcome {
    /// The all-empty result used for unknown tenants and short-circuited
    /// queries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result from ranked `(chunk, score)` pairs.
    pub fn from_ranked<'a>(ranked: impl IntoIterator<Item = (&'a Chunk, f32)>) -> Self {
        let mut outcome = Self::default();
        for (chunk, score) in ranked {
            outcome.ids.push(chunk.id.to_string());
            outcome.distances.push(score);
            outcome.metadatas.push(chunk.metadata.clone());
            outcome.documents.push(chunk.text.clone());
        }
        outcome
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Store-wide statistics for the stats/health surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of tenants with at least one chunk
    pub tenants: u64,
    /// Chunks across all tenants
    pub total_chunks: u64,
}
