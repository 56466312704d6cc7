//! Query-time ranking for ragcell.
//!
//! A query passes through pre-filters, then one of three interchangeable
//! similarity backends, then the engine's rank/clamp/truncate step:
//!
//! - [`LexicalBackend`]: token overlap + character sequence similarity
//! - [`VectorBackend`]: embedding distance over the flat exact index
//! - [`RemoteBackend`]: delegation to the external managed vector store
//!
//! Backends implement [`SimilarityBackend`] and are chosen once at
//! construction; the engine never mixes scores across backends.
//!
//! [`SimilarityBackend`]: ragcell_core::SimilarityBackend

mod engine;
mod lexical;
pub mod prefilter;
mod remote;
mod vector;

pub use engine::{QueryEngine, DEFAULT_QUERY_TIMEOUT};
pub use lexical::LexicalBackend;
pub use prefilter::{PrefilterConfig, PrefilterDecision};
pub use remote::RemoteBackend;
pub use vector::VectorBackend;
