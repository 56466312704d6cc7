//! Document storage for ragcell.
//!
//! - [`DocumentStore`]: per-tenant in-memory chunk store with an optional
//!   flat exact vector index per tenant
//! - [`snapshot`]: best-effort JSON persistence of all tenants
//! - [`RemoteVectorStore`]: HTTP client for an external managed vector store

mod memory;
mod remote;
pub mod snapshot;

pub use memory::{cosine_similarity, dot_product, DocumentStore, NewChunk};
pub use remote::{RemoteVectorStore, RemoteVectorStoreConfig};
