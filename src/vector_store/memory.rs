//! In-memory vector index.

use super::{cosine_similarity, IndexedChunk, SearchResult, VectorIndex};
use crate::error::{Result, TubeQaError};

/// Brute-force cosine index held in memory.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    entries: Vec<IndexedChunk>,
    dimensions: Option<usize>,
}

impl MemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimension of the stored vectors, once known.
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}

impl VectorIndex for MemoryIndex {
    fn insert_batch(&mut self, entries: Vec<IndexedChunk>) -> Result<usize> {
        let count = entries.len();

        for entry in entries {
            let dims = entry.embedding.len();
            match self.dimensions {
                Some(expected) if expected != dims => {
                    return Err(TubeQaError::external(
                        "embedding service",
                        format!(
                            "inconsistent embedding dimensions: expected {}, got {}",
                            expected, dims
                        ),
                    ));
                }
                Some(_) => {}
                None => self.dimensions = Some(dims),
            }
            self.entries.push(entry);
        }

        Ok(count)
    }

    fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        // Stable sort: equal scores keep insertion order.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        results
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
