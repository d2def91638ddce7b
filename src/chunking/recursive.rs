//! Recursive semantic splitting.
//!
//! Built on `text-splitter`, which tries coarse boundaries (paragraphs, lines, sentences)
//! before fine ones (words) and carries the tail of each chunk into the next as overlap.
//! Trimming is disabled so every chunk is an exact slice of the text and consecutive
//! chunks either touch or overlap.

use super::{Chunker, ChunkingConfig, TextChunk};
use crate::error::{Result, TubeQaError};
use text_splitter::{ChunkConfig, ChunkSizer, TextSplitter};
use tracing::debug;

/// Splits text at the coarsest boundary that keeps chunks within the size limit.
#[derive(Debug, Default)]
pub struct RecursiveSplitter;

impl RecursiveSplitter {
    pub fn new() -> Self {
        Self
    }
}

/// Sizes chunks in characters.
///
/// A chunk without inner whitespace is one word. It is reported as fitting however long it
/// is, so the splitter never descends below word boundaries and an oversized word stays
/// whole.
#[derive(Debug, Clone, Copy)]
struct WordSizer {
    capacity: usize,
}

impl ChunkSizer for WordSizer {
    fn size(&self, chunk: &str) -> usize {
        let chars = chunk.chars().count();
        if chunk.trim().contains(char::is_whitespace) {
            chars
        } else {
            chars.min(self.capacity)
        }
    }
}

impl Chunker for RecursiveSplitter {
    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Result<Vec<TextChunk>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let chunk_config = ChunkConfig::new(config.chunk_size)
            .with_sizer(WordSizer {
                capacity: config.chunk_size,
            })
            .with_trim(false)
            .with_overlap(config.chunk_overlap)
            .map_err(|e| TubeQaError::Config(format!("invalid chunking settings: {}", e)))?;
        let splitter = TextSplitter::new(chunk_config);

        let chunks: Vec<TextChunk> = splitter
            .chunk_indices(text)
            .enumerate()
            .map(|(order, (start, content))| TextChunk {
                order,
                start,
                end: start + content.len(),
                content: content.to_string(),
            })
            .collect();

        debug!(
            "Split {} characters into {} chunks",
            text.chars().count(),
            chunks.len()
        );
        Ok(chunks)
    }
}
