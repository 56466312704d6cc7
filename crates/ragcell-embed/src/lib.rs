//! Embedding collaborators for ragcell.
//!
//! The engine treats embedding as an external service behind the
//! [`Embedder`] trait:
//!
//! - [`RemoteEmbedder`]: OpenAI-compatible `/embeddings` HTTP client with a
//!   hard request deadline
//! - [`NoopEmbedder`]: zero-vector embedder for tests and dev builds
//! - [`EmbedderPool`]: semaphore-limited wrapper bounding concurrent
//!   provider calls
//!
//! [`Embedder`]: ragcell_core::Embedder

mod noop;
mod pool;
mod remote;

pub use noop::NoopEmbedder;
pub use pool::EmbedderPool;
pub use remote::{RemoteEmbedder, RemoteEmbedderConfig};
