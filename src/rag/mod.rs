//! Retrieval-augmented answering.
//!
//! Retrieves the transcript chunks closest to a question and asks a language model to
//! answer from them alone.

pub mod context;
mod generator;
mod retriever;

pub use context::format_context;
pub use generator::{AnswerGenerator, LanguageModel, OpenAIChatModel};
pub use retriever::{Retriever, TOP_K};
