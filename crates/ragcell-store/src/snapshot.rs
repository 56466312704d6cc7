//! Best-effort JSON snapshot persistence.
//!
//! The store is in-memory; the snapshot lets a CLI process pick up where the
//! previous one left off. There is no durability guarantee: the snapshot is
//! written after mutations and a crash in between simply loses the delta.
//! A missing file is a fresh start, a corrupt one is a snapshot error.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use ragcell_core::{Chunk, StoreError};

use crate::DocumentStore;

/// Write all tenants to `path` as JSON. The parent directory must exist.
pub async fn save(store: &DocumentStore, path: &Path) -> Result<(), StoreError> {
    let data = store.export().await;
    let json = serde_json::to_vec_pretty(&data)
        .map_err(|e| StoreError::Snapshot(format!("serialize failed: {e}")))?;

    // write to a sibling temp file first so a crash never truncates the
    // previous snapshot
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &json)
        .await
        .map_err(|e| StoreError::Snapshot(format!("write {}: {e}", tmp.display())))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::Snapshot(format!("rename {}: {e}", path.display())))?;

    debug!(path = %path.display(), tenants = data.len(), "saved snapshot");
    Ok(())
}

/// Load a snapshot into `store`, replacing its state. A missing file is not
/// an error; the store is left empty.
pub async fn load(store: &DocumentStore, path: &Path) -> Result<(), StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no snapshot, starting empty");
            return Ok(());
        }
        Err(e) => return Err(StoreError::Snapshot(format!("read {}: {e}", path.display()))),
    };

    let data: HashMap<String, Vec<Chunk>> = serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::Snapshot(format!("parse {}: {e}", path.display())))?;

    let tenants = data.len();
    store.restore(data).await?;
    info!(path = %path.display(), tenants, "loaded snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewChunk;
    use chrono::Utc;
    use ragcell_core::{ChunkMetadata, ContentType, DistanceMetric};

    fn entry(text: &str, embedding: Option<Vec<f32>>) -> NewChunk {
        NewChunk {
            text: text.to_string(),
            metadata: ChunkMetadata {
                source: "snap.txt".to_string(),
                content_type: ContentType::Text,
                uploaded_at: Utc::now(),
                word_count: 1,
            },
            embedding,
        }
    }

    #[tokio::test]
    async fn save_then_load_roundtrips_tenants() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let store = DocumentStore::new();
        store.append("alice", vec![entry("a", None), entry("b", None)]).await.unwrap();
        store.append("bob", vec![entry("c", Some(vec![1.0, 0.0]))]).await.unwrap();
        save(&store, &path).await.unwrap();

        let loaded = DocumentStore::new();
        load(&loaded, &path).await.unwrap();

        assert_eq!(loaded.count("alice").await, 2);
        assert_eq!(loaded.count("bob").await, 1);
        assert_eq!(loaded.chunks("alice").await[1].text, "b");

        // index rebuilt from stored embeddings
        let scored = loaded
            .score_vectors("bob", &[1.0, 0.0], DistanceMetric::Cosine)
            .await
            .unwrap();
        assert_eq!(scored.len(), 1);
    }

    #[tokio::test]
    async fn missing_snapshot_is_a_fresh_start() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new();
        load(&store, &dir.path().join("absent.json")).await.unwrap();
        assert_eq!(store.stats().await.tenants, 0);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = DocumentStore::new();
        let err = load(&store, &path).await.unwrap_err();
        assert!(matches!(err, StoreError::Snapshot(_)));
    }
}
