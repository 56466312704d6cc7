//! Chunk, embed, append.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use ragcell_chunker::FixedChunker;
use ragcell_core::{ChunkMetadata, ContentType, IngestOutcome, RemoteIndex};
use ragcell_embed::EmbedderPool;
use ragcell_store::{DocumentStore, NewChunk};

/// How ingested chunks are prepared for later querying.
#[derive(Clone)]
pub enum IngestMode {
    /// Chunks are stored as text only; scoring happens lexically at query
    /// time.
    Lexical,
    /// Every chunk is embedded before it is stored. An embedding failure
    /// aborts the whole call with nothing appended.
    Vector { pool: Arc<EmbedderPool> },
    /// Chunks are upserted into the external managed store (which embeds
    /// server-side) and mirrored locally as text.
    Remote { remote: Arc<dyn RemoteIndex> },
}

/// The ingestion pipeline.
///
/// One call ingests one document for one tenant. The append is
/// all-or-nothing: either every chunk of the document lands in the store
/// (and the index, in vector mode) or none does.
pub struct IngestPipeline {
    store: Arc<DocumentStore>,
    chunker: FixedChunker,
    mode: IngestMode,
}

impl IngestPipeline {
    pub fn new(store: Arc<DocumentStore>, chunker: FixedChunker, mode: IngestMode) -> Self {
        Self {
            store,
            chunker,
            mode,
        }
    }

    /// Ingest one document. Failures come back inside the outcome.
    pub async fn ingest(
        &self,
        tenant: &str,
        text: &str,
        source: &str,
        content_type: ContentType,
    ) -> IngestOutcome {
        if text.trim().is_empty() {
            warn!(tenant, source, "document has no readable text");
            return IngestOutcome::failed(format!("no readable text in {source}"));
        }

        let pieces = self.chunker.chunk(text);
        debug!(tenant, source, pieces = pieces.len(), "chunked document");

        // one metadata record per ingest call, shared by all its chunks;
        // word_count covers the whole document, not the chunk
        let metadata = ChunkMetadata {
            source: source.to_string(),
            content_type,
            uploaded_at: Utc::now(),
            word_count: text.split_whitespace().count(),
        };

        let entries: Vec<NewChunk> = match &self.mode {
            IngestMode::Lexical => pieces
                .into_iter()
                .map(|p| NewChunk {
                    text: p.text,
                    metadata: metadata.clone(),
                    embedding: None,
                })
                .collect(),
            IngestMode::Vector { pool } => {
                let texts: Vec<&str> = pieces.iter().map(|p| p.text.as_str()).collect();
                let vectors = match pool.embed_batch(&texts).await {
                    Ok(vectors) => vectors,
                    Err(e) => {
                        warn!(tenant, source, error = %e, "embedding failed, nothing appended");
                        return IngestOutcome::failed(format!("embedding failed: {e}"));
                    }
                };
                if vectors.len() != pieces.len() {
                    return IngestOutcome::failed(format!(
                        "embedding failed: expected {} vectors, got {}",
                        pieces.len(),
                        vectors.len()
                    ));
                }
                pieces
                    .into_iter()
                    .zip(vectors)
                    .map(|(p, v)| NewChunk {
                        text: p.text,
                        metadata: metadata.clone(),
                        embedding: Some(v),
                    })
                    .collect()
            }
            IngestMode::Remote { remote } => {
                // ids the store will assign next; valid under the one
                // writer per tenant discipline
                let base = self.store.count(tenant).await as u64;
                let records: Vec<(u64, &str)> = pieces
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (base + i as u64, p.text.as_str()))
                    .collect();
                if let Err(e) = remote.upsert(tenant, &records).await {
                    warn!(tenant, source, error = %e, "remote upsert failed, nothing appended");
                    return IngestOutcome::failed(format!("remote upsert failed: {e}"));
                }
                pieces
                    .into_iter()
                    .map(|p| NewChunk {
                        text: p.text,
                        metadata: metadata.clone(),
                        embedding: None,
                    })
                    .collect()
            }
        };

        match self.store.append(tenant, entries).await {
            Ok(ids) => {
                info!(tenant, source, count = ids.len(), "ingested document");
                IngestOutcome::appended(ids)
            }
            Err(e) => {
                warn!(tenant, source, error = %e, "append rejected");
                IngestOutcome::failed(e.to_string())
            }
        }
    }

    /// Remove every chunk the tenant owns, returning how many were dropped.
    ///
    /// In remote mode the external namespace is deleted first; if that call
    /// fails, the local store is left untouched so the two sides never hold
    /// different corpora.
    pub async fn clear(&self, tenant: &str) -> ragcell_core::Result<usize> {
        if let IngestMode::Remote { remote } = &self.mode {
            remote.delete_namespace(tenant).await?;
        }
        let removed = self.store.clear(tenant).await;
        info!(tenant, removed, "cleared tenant");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ragcell_core::{EmbedError, Embedder};

    fn lexical_pipeline(store: Arc<DocumentStore>, chunk_size: usize) -> IngestPipeline {
        IngestPipeline::new(store, FixedChunker::new(chunk_size), IngestMode::Lexical)
    }

    #[tokio::test]
    async fn ingest_splits_and_assigns_string_ids() {
        let store = Arc::new(DocumentStore::new());
        let pipeline = lexical_pipeline(Arc::clone(&store), 10);

        let outcome = pipeline
            .ingest("alice", "hello world foo bar", "notes.txt", ContentType::Text)
            .await;

        assert_eq!(outcome.count, 2);
        assert_eq!(outcome.ids, vec!["0", "1"]);
        assert!(outcome.error.is_none());

        let chunks = store.chunks("alice").await;
        assert_eq!(chunks[0].text, "hello worl");
        assert_eq!(chunks[1].text, "d foo bar");
    }

    #[tokio::test]
    async fn repeat_ingest_extends_ids() {
        let store = Arc::new(DocumentStore::new());
        let pipeline = lexical_pipeline(Arc::clone(&store), 10);

        pipeline
            .ingest("alice", "hello world foo bar", "notes.txt", ContentType::Text)
            .await;
        let outcome = pipeline
            .ingest("alice", "hello world foo bar", "notes.txt", ContentType::Text)
            .await;

        assert_eq!(outcome.ids, vec!["2", "3"]);
        assert_eq!(store.count("alice").await, 4);
    }

    #[tokio::test]
    async fn empty_document_fails_structurally() {
        let store = Arc::new(DocumentStore::new());
        let pipeline = lexical_pipeline(Arc::clone(&store), 10);

        let outcome = pipeline
            .ingest("alice", "   \n\t ", "blank.txt", ContentType::Text)
            .await;

        assert_eq!(outcome.count, 0);
        assert!(outcome.ids.is_empty());
        assert_eq!(outcome.error.as_deref(), Some("no readable text in blank.txt"));
        assert_eq!(store.count("alice").await, 0);
    }

    #[tokio::test]
    async fn metadata_word_count_covers_whole_document() {
        let store = Arc::new(DocumentStore::new());
        let pipeline = lexical_pipeline(Arc::clone(&store), 5);

        pipeline
            .ingest("alice", "one two three four", "words.txt", ContentType::Text)
            .await;

        let chunks = store.chunks("alice").await;
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.metadata.word_count == 4));
        assert!(chunks.iter().all(|c| c.metadata.source == "words.txt"));
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        fn model_name(&self) -> &str {
            "failing"
        }

        fn dimension(&self) -> usize {
            4
        }

        async fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Err(EmbedError::Timeout)
        }
    }

    #[tokio::test]
    async fn embedding_failure_appends_nothing() {
        let store = Arc::new(DocumentStore::new());
        let pool = Arc::new(EmbedderPool::new(Arc::new(FailingEmbedder), 2));
        let pipeline = IngestPipeline::new(
            Arc::clone(&store),
            FixedChunker::new(10),
            IngestMode::Vector { pool },
        );

        let outcome = pipeline
            .ingest("alice", "hello world foo bar", "notes.txt", ContentType::Text)
            .await;

        assert_eq!(outcome.count, 0);
        assert!(outcome.error.as_deref().unwrap().contains("embedding failed"));
        assert_eq!(store.count("alice").await, 0);
    }

    struct CountingEmbedder;

    #[async_trait]
    impl Embedder for CountingEmbedder {
        fn model_name(&self) -> &str {
            "counting"
        }

        fn dimension(&self) -> usize {
            2
        }

        async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Ok(texts
                .iter()
                .map(|t| vec![t.chars().count() as f32, 1.0])
                .collect())
        }
    }

    #[tokio::test]
    async fn vector_mode_stores_embeddings_with_chunks() {
        let store = Arc::new(DocumentStore::new());
        let pool = Arc::new(EmbedderPool::new(Arc::new(CountingEmbedder), 2));
        let pipeline = IngestPipeline::new(
            Arc::clone(&store),
            FixedChunker::new(10),
            IngestMode::Vector { pool },
        );

        let outcome = pipeline
            .ingest("alice", "hello world foo bar", "notes.txt", ContentType::Text)
            .await;

        assert_eq!(outcome.count, 2);
        let chunks = store.chunks("alice").await;
        assert_eq!(chunks[0].embedding, Some(vec![10.0, 1.0]));
        assert_eq!(chunks[1].embedding, Some(vec![9.0, 1.0]));
    }

    use ragcell_core::{BackendError, RemoteHit};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockRemote {
        fail_upsert: bool,
        fail_delete: bool,
        upserted: Mutex<Vec<(String, u64, String)>>,
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RemoteIndex for MockRemote {
        async fn upsert(
            &self,
            tenant: &str,
            records: &[(u64, &str)],
        ) -> std::result::Result<(), BackendError> {
            if self.fail_upsert {
                return Err(BackendError::Remote("upsert refused".to_string()));
            }
            let mut upserted = self.upserted.lock().unwrap();
            for (id, text) in records {
                upserted.push((tenant.to_string(), *id, (*text).to_string()));
            }
            Ok(())
        }

        async fn query(
            &self,
            _tenant: &str,
            _text: &str,
            _top_k: usize,
        ) -> std::result::Result<Vec<RemoteHit>, BackendError> {
            Ok(Vec::new())
        }

        async fn delete_namespace(&self, tenant: &str) -> std::result::Result<(), BackendError> {
            if self.fail_delete {
                return Err(BackendError::Remote("delete refused".to_string()));
            }
            self.deleted.lock().unwrap().push(tenant.to_string());
            Ok(())
        }
    }

    fn remote_pipeline(
        store: Arc<DocumentStore>,
        remote: Arc<MockRemote>,
    ) -> IngestPipeline {
        IngestPipeline::new(
            store,
            FixedChunker::new(10),
            IngestMode::Remote { remote },
        )
    }

    #[tokio::test]
    async fn remote_mode_upserts_with_the_ids_the_store_assigns() {
        let store = Arc::new(DocumentStore::new());
        let remote = Arc::new(MockRemote::default());
        let pipeline = remote_pipeline(Arc::clone(&store), Arc::clone(&remote));

        pipeline
            .ingest("alice", "hello world foo bar", "notes.txt", ContentType::Text)
            .await;
        let outcome = pipeline
            .ingest("alice", "more text here", "extra.txt", ContentType::Text)
            .await;

        assert_eq!(outcome.ids, vec!["2", "3"]);
        let upserted = remote.upserted.lock().unwrap();
        let ids: Vec<u64> = upserted.iter().map(|(_, id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(upserted.iter().all(|(tenant, _, _)| tenant == "alice"));
    }

    #[tokio::test]
    async fn remote_upsert_failure_appends_nothing() {
        let store = Arc::new(DocumentStore::new());
        let remote = Arc::new(MockRemote {
            fail_upsert: true,
            ..Default::default()
        });
        let pipeline = remote_pipeline(Arc::clone(&store), remote);

        let outcome = pipeline
            .ingest("alice", "hello world foo bar", "notes.txt", ContentType::Text)
            .await;

        assert_eq!(outcome.count, 0);
        assert!(outcome.error.as_deref().unwrap().contains("remote upsert failed"));
        assert_eq!(store.count("alice").await, 0);
    }

    #[tokio::test]
    async fn clear_drops_remote_namespace_and_local_chunks() {
        let store = Arc::new(DocumentStore::new());
        let remote = Arc::new(MockRemote::default());
        let pipeline = remote_pipeline(Arc::clone(&store), Arc::clone(&remote));

        pipeline
            .ingest("alice", "hello world foo bar", "notes.txt", ContentType::Text)
            .await;
        let removed = pipeline.clear("alice").await.unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.count("alice").await, 0);
        assert_eq!(*remote.deleted.lock().unwrap(), vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn clear_leaves_local_chunks_when_the_remote_delete_fails() {
        let store = Arc::new(DocumentStore::new());
        let remote = Arc::new(MockRemote {
            fail_delete: true,
            ..Default::default()
        });
        let pipeline = remote_pipeline(Arc::clone(&store), remote);

        pipeline
            .ingest("alice", "hello world foo bar", "notes.txt", ContentType::Text)
            .await;
        let err = pipeline.clear("alice").await.unwrap_err();

        assert!(err.to_string().contains("delete refused"));
        assert_eq!(store.count("alice").await, 2);
    }

    #[tokio::test]
    async fn clear_in_lexical_mode_never_touches_the_network() {
        let store = Arc::new(DocumentStore::new());
        let pipeline = lexical_pipeline(Arc::clone(&store), 10);

        pipeline
            .ingest("alice", "hello world foo bar", "notes.txt", ContentType::Text)
            .await;
        let removed = pipeline.clear("alice").await.unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.count("alice").await, 0);
    }
}
