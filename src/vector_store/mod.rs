//! Vector index over transcript chunks.
//!
//! Indexes are built per question and dropped afterwards; nothing is persisted.

mod memory;

pub use memory::MemoryIndex;

use crate::chunking::TextChunk;
use crate::embedding::Embedder;
use crate::error::{Result, TubeQaError};
use serde::Serialize;
use tracing::{info, instrument};

/// A chunk with its embedding.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: TextChunk,
    pub embedding: Vec<f32>,
}

/// A search result with score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// The matched chunk.
    pub chunk: TextChunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for nearest-neighbour indexes.
pub trait VectorIndex: Send + Sync {
    /// Add chunks with their embeddings. Returns the number added.
    fn insert_batch(&mut self, entries: Vec<IndexedChunk>) -> Result<usize>;

    /// Return up to `limit` chunks ranked by descending similarity to `query_embedding`.
    fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<SearchResult>;

    /// Number of indexed chunks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Embed every chunk and build a fresh in-memory index.
///
/// Any embedding failure aborts the build; a partial index is never returned.
#[instrument(skip_all, fields(chunks = chunks.len()))]
pub async fn build_index(embedder: &dyn Embedder, chunks: &[TextChunk]) -> Result<MemoryIndex> {
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    if embeddings.len() != chunks.len() {
        return Err(TubeQaError::external(
            "embedding service",
            format!(
                "expected {} embeddings, received {}",
                chunks.len(),
                embeddings.len()
            ),
        ));
    }

    let expected = embedder.dimensions();
    if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
        return Err(TubeQaError::external(
            "embedding service",
            format!(
                "expected {}-dimensional embeddings, received {}",
                expected,
                bad.len()
            ),
        ));
    }

    let entries = chunks
        .iter()
        .cloned()
        .zip(embeddings)
        .map(|(chunk, embedding)| IndexedChunk { chunk, embedding })
        .collect();

    let mut index = MemoryIndex::new();
    let count = index.insert_batch(entries)?;
    info!("Indexed {} chunks", count);

    Ok(index)
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
