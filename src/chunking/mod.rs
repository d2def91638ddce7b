//! Transcript chunking.
//!
//! Splits the transcript text into overlapping, size-bounded chunks ready for embedding.

mod recursive;

pub use recursive::RecursiveSplitter;

use crate::config::ChunkingSettings;
use crate::error::Result;
use serde::Serialize;

/// A contiguous slice of the transcript text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChunk {
    /// Position of this chunk in the transcript.
    pub order: usize,
    /// Byte offset where the chunk starts in the transcript.
    pub start: usize,
    /// Byte offset one past the chunk's end.
    pub end: usize,
    /// Text content (`transcript[start..end]`).
    pub content: String,
}

impl TextChunk {
    /// Length of the content in characters.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// Configuration for chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Maximum number of characters carried over into the next chunk.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl From<&ChunkingSettings> for ChunkingConfig {
    fn from(settings: &ChunkingSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            chunk_overlap: settings.chunk_overlap,
        }
    }
}

/// Trait for text chunking implementations.
pub trait Chunker: Send + Sync {
    /// Split text into ordered chunks. Fails when the config cannot be honored.
    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Result<Vec<TextChunk>>;
}
