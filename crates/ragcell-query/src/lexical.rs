//! Lexical similarity scoring, no embeddings involved.
//!
//! Each chunk is scored as `0.7 * word_overlap + 0.3 * sequence_similarity`
//! where word overlap is the fraction of query tokens present in the chunk
//! and sequence similarity is the longest-common-subsequence ratio over
//! lowercased characters. Scores land in [0, 1].

use async_trait::async_trait;
use std::collections::HashSet;

use ragcell_core::{BackendError, BackendKind, Chunk, ScoredChunk, SimilarityBackend};

const WORD_WEIGHT: f32 = 0.7;
const SEQUENCE_WEIGHT: f32 = 0.3;

/// Lowercased alphanumeric tokens.
fn tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fraction of query tokens that appear in the chunk. 0.0 when the query
/// has no tokens.
fn word_overlap(query_tokens: &HashSet<String>, chunk_tokens: &HashSet<String>) -> f32 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let shared = query_tokens.intersection(chunk_tokens).count();
    shared as f32 / query_tokens.len() as f32
}

/// `2 * lcs / (len_a + len_b)` over characters; 1.0 for two empty strings.
fn sequence_similarity(a: &[char], b: &[char]) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // two-row LCS, O(len_a * len_b) time, O(len_b) space
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let lcs = prev[b.len()];
    2.0 * lcs as f32 / (a.len() + b.len()) as f32
}

/// Scores chunks by token overlap and character similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalBackend;

impl LexicalBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Combined score for one query/chunk pair.
    pub fn score_pair(query: &str, chunk_text: &str) -> f32 {
        let query_tokens = tokens(query);
        let chunk_tokens = tokens(chunk_text);
        let overlap = word_overlap(&query_tokens, &chunk_tokens);

        let query_chars: Vec<char> = query.to_lowercase().chars().collect();
        let chunk_chars: Vec<char> = chunk_text.to_lowercase().chars().collect();
        let sequence = sequence_similarity(&query_chars, &chunk_chars);

        WORD_WEIGHT * overlap + SEQUENCE_WEIGHT * sequence
    }
}

#[async_trait]
impl SimilarityBackend for LexicalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Lexical
    }

    async fn score(
        &self,
        _tenant: &str,
        query: &str,
        chunks: &[Chunk],
    ) -> Result<Vec<ScoredChunk>, BackendError> {
        let query_tokens = tokens(query);
        let query_chars: Vec<char> = query.to_lowercase().chars().collect();

        Ok(chunks
            .iter()
            .map(|chunk| {
                let chunk_tokens = tokens(&chunk.text);
                let overlap = word_overlap(&query_tokens, &chunk_tokens);
                let chunk_chars: Vec<char> = chunk.text.to_lowercase().chars().collect();
                let sequence = sequence_similarity(&query_chars, &chunk_chars);
                ScoredChunk {
                    id: chunk.id,
                    score: WORD_WEIGHT * overlap + SEQUENCE_WEIGHT * sequence,
                }
            })
            .collect())
    }
}
