//! Text chunking for ragcell.
//!
//! Documents are split into fixed-size character windows with no overlap.
//! Chunking is deterministic: the same text and chunk size always yield the
//! same pieces, and `ceil(len / chunk_size)` of them.

mod fixed;

pub use fixed::{FixedChunker, Piece, DEFAULT_CHUNK_SIZE};
