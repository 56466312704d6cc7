//! Fixed-size chunking with no overlap.

use tracing::debug;

/// Default window size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// One window of a chunked document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The window text
    pub text: String,
    /// Position of this window within the document, from 0
    pub index: usize,
    /// Character offset of the window start
    pub start_offset: usize,
}

/// Splits text into consecutive fixed-size character windows.
///
/// Windows are measured in characters, not bytes, so multi-byte text never
/// splits inside a code point. The last window may be shorter; no window is
/// empty.
#[derive(Debug, Clone)]
pub struct FixedChunker {
    chunk_size: usize,
}

impl FixedChunker {
    /// Create a chunker with the given window size. A size of 0 is clamped
    /// to 1.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split `text` into windows. Empty input yields no pieces.
    pub fn chunk(&self, text: &str) -> Vec<Piece> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut pieces = Vec::with_capacity(chars.len().div_ceil(self.chunk_size));

        for (index, window) in chars.chunks(self.chunk_size).enumerate() {
            pieces.push(Piece {
                text: window.iter().collect(),
                index,
                start_offset: index * self.chunk_size,
            });
        }

        debug!(
            chars = chars.len(),
            chunk_size = self.chunk_size,
            pieces = pieces.len(),
            "chunked document"
        );
        pieces
    }
}

impl Default for FixedChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}
