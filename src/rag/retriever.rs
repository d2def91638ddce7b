//! Top-k retrieval for a question.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{SearchResult, VectorIndex};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of chunks handed to the language model.
pub const TOP_K: usize = 4;

/// Finds the chunks most similar to a question.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    /// The embedder must be the one the index was built with.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Return up to [`TOP_K`] chunks, most similar first.
    ///
    /// An index holding fewer chunks yields all of them.
    #[instrument(skip(self, index), fields(indexed = index.len()))]
    pub async fn retrieve(&self, index: &dyn VectorIndex, question: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(question).await?;
        let results = index.search(&query_embedding, TOP_K);
        debug!("Retrieved {} chunks", results.len());
        Ok(results)
    }
}
