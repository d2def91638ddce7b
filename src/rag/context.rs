//! Context formatting for answer prompts.

use crate::vector_store::SearchResult;

/// Join retrieved chunk texts, in rank order, separated by a blank line.
pub fn format_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
