//! Per-tenant in-memory document store with a flat exact vector index.
//!
//! Tenants are the isolation boundary: each tenant owns a shard behind its
//! own `RwLock`, so writes to one tenant never block reads of another.
//! Chunk ids are contiguous from 0 within a tenant and never reused until
//! the tenant is cleared.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use ragcell_core::{Chunk, ChunkMetadata, DistanceMetric, ScoredChunk, StoreError, StoreStats};

/// Cosine similarity; 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Plain dot product.
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Exact brute-force index over a tenant's embedded chunks.
///
/// The dimension is fixed by the first vector added; every later vector
/// must match. Entries are `(chunk id, vector)` pairs so the index stays
/// aligned with the chunk list even if some chunks carry no embedding.
#[derive(Debug, Default)]
struct FlatIndex {
    dimension: usize,
    entries: Vec<(u64, Vec<f32>)>,
}

impl FlatIndex {
    /// Add a batch of vectors. All dimensions are validated before any
    /// mutation, so a mismatch leaves the index unchanged.
    fn add_batch(&mut self, batch: &[(u64, Vec<f32>)]) -> Result<(), StoreError> {
        let Some(first) = batch.first() else {
            return Ok(());
        };
        let expected = if self.entries.is_empty() {
            first.1.len()
        } else {
            self.dimension
        };

        for (_, vector) in batch {
            if vector.len() != expected {
                return Err(StoreError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
        }

        self.dimension = expected;
        self.entries.extend_from_slice(batch);
        Ok(())
    }

    fn score(&self, query: &[f32], metric: DistanceMetric) -> Result<Vec<ScoredChunk>, StoreError> {
        if !self.entries.is_empty() && query.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        Ok(self
            .entries
            .iter()
            .map(|(id, vector)| ScoredChunk {
                id: *id,
                score: match metric {
                    DistanceMetric::Cosine => cosine_similarity(query, vector),
                    DistanceMetric::Dot => dot_product(query, vector),
                },
            })
            .collect())
    }
}

/// One chunk to append, before the store assigns its id.
#[derive(Debug, Clone)]
pub struct NewChunk {
    pub text: String,
    pub metadata: ChunkMetadata,
    pub embedding: Option<Vec<f32>>,
}

#[derive(Default)]
struct TenantShard {
    chunks: Vec<Chunk>,
    index: FlatIndex,
}

/// Multi-tenant in-memory document store.
///
/// The outer map lock is held only long enough to find or create a tenant
/// shard; all chunk access goes through the per-tenant lock.
pub struct DocumentStore {
    tenants: RwLock<HashMap<String, Arc<RwLock<TenantShard>>>>,
}

impl DocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
        }
    }

    async fn shard(&self, tenant: &str) -> Option<Arc<RwLock<TenantShard>>> {
        self.tenants.read().await.get(tenant).cloned()
    }

    async fn shard_or_create(&self, tenant: &str) -> Arc<RwLock<TenantShard>> {
        let mut tenants = self.tenants.write().await;
        tenants
            .entry(tenant.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(TenantShard::default())))
            .clone()
    }

    /// Append chunks to a tenant, assigning contiguous ids.
    ///
    /// The append is all-or-nothing: embedding dimensions are validated
    /// against the tenant's index before any chunk or vector is stored, so
    /// a mismatch leaves both untouched.
    pub async fn append(
        &self,
        tenant: &str,
        entries: Vec<NewChunk>,
    ) -> Result<Vec<u64>, StoreError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let shard = self.shard_or_create(tenant).await;
        let mut shard = shard.write().await;

        let next_id = shard.chunks.len() as u64;
        let ids: Vec<u64> = (0..entries.len() as u64).map(|i| next_id + i).collect();

        let vectors: Vec<(u64, Vec<f32>)> = ids
            .iter()
            .zip(&entries)
            .filter_map(|(id, entry)| entry.embedding.clone().map(|v| (*id, v)))
            .collect();
        shard.index.add_batch(&vectors)?;

        for (id, entry) in ids.iter().zip(entries) {
            shard.chunks.push(Chunk {
                id: *id,
                text: entry.text,
                metadata: entry.metadata,
                embedding: entry.embedding,
            });
        }

        debug!(tenant, appended = ids.len(), total = shard.chunks.len(), "appended chunks");
        Ok(ids)
    }

    /// Snapshot of a tenant's chunks in id order. Unknown tenants yield an
    /// empty list.
    pub async fn chunks(&self, tenant: &str) -> Vec<Chunk> {
        match self.shard(tenant).await {
            Some(shard) => shard.read().await.chunks.clone(),
            None => Vec::new(),
        }
    }

    pub async fn count(&self, tenant: &str) -> usize {
        match self.shard(tenant).await {
            Some(shard) => shard.read().await.chunks.len(),
            None => 0,
        }
    }

    /// Remove all state for a tenant. Removing the map entry drops chunks
    /// and index together, so no query can observe one without the other.
    /// Returns the number of chunks removed.
    pub async fn clear(&self, tenant: &str) -> usize {
        let removed = self.tenants.write().await.remove(tenant);
        match removed {
            Some(shard) => {
                let count = shard.read().await.chunks.len();
                debug!(tenant, count, "cleared tenant");
                count
            }
            None => 0,
        }
    }

    /// Score a query vector against every indexed chunk of a tenant.
    pub async fn score_vectors(
        &self,
        tenant: &str,
        query: &[f32],
        metric: DistanceMetric,
    ) -> Result<Vec<ScoredChunk>, StoreError> {
        match self.shard(tenant).await {
            Some(shard) => shard.read().await.index.score(query, metric),
            None => Ok(Vec::new()),
        }
    }

    pub async fn tenants(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tenants.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn stats(&self) -> StoreStats {
        let tenants = self.tenants.read().await;
        let mut total_chunks = 0u64;
        for shard in tenants.values() {
            total_chunks += shard.read().await.chunks.len() as u64;
        }
        StoreStats {
            tenants: tenants.len() as u64,
            total_chunks,
        }
    }

    /// Export every tenant's chunks, for snapshot persistence.
    pub async fn export(&self) -> HashMap<String, Vec<Chunk>> {
        let tenants = self.tenants.read().await;
        let mut out = HashMap::with_capacity(tenants.len());
        for (name, shard) in tenants.iter() {
            out.insert(name.clone(), shard.read().await.chunks.clone());
        }
        out
    }

    /// Replace all state from exported data, rebuilding vector indices
    /// from stored embeddings.
    pub async fn restore(&self, data: HashMap<String, Vec<Chunk>>) -> Result<(), StoreError> {
        let mut rebuilt = HashMap::with_capacity(data.len());
        for (name, chunks) in data {
            let mut index = FlatIndex::default();
            let vectors: Vec<(u64, Vec<f32>)> = chunks
                .iter()
                .filter_map(|c| c.embedding.clone().map(|v| (c.id, v)))
                .collect();
            index.add_batch(&vectors).map_err(|e| {
                StoreError::Snapshot(format!("tenant {name}: {e}"))
            })?;
            rebuilt.insert(name, Arc::new(RwLock::new(TenantShard { chunks, index })));
        }

        let mut tenants = self.tenants.write().await;
        *tenants = rebuilt;
        Ok(())
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
