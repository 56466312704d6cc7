//! Core types for ragcell.
//!
//! This crate defines the shared vocabulary of the retrieval engine:
//!
//! - [`Chunk`]: a fixed-size slice of ingested text, the unit of ranking
//! - [`ChunkMetadata`]: per-ingest metadata attached to every chunk
//! - [`IngestOutcome`] / [`QueryOutcome`]: the structured results returned
//!   at the API boundary
//! - [`Embedder`], [`SimilarityBackend`], [`FileReader`]: the trait seams
//!   behind which the external collaborators and scoring variants live
//! - [`Error`] and the per-concern error enums
//!
//! Tenants are plain string identifiers and the isolation boundary for all
//! stored state; chunk ids are contiguous integers starting at 0 within a
//! tenant.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BackendError, EmbedError, Error, ReadError, Result, StoreError};
pub use traits::{Embedder, FileReader, RemoteIndex, SimilarityBackend};
pub use types::{
    BackendKind, Chunk, ChunkMetadata, ContentType, DistanceMetric, IngestOutcome, QueryOutcome,
    RemoteHit, ScoredChunk, StoreStats, DEFAULT_TENANT,
};
