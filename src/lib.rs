//! TubeQA - Question answering over YouTube video transcripts
//!
//! Fetches the captions of a video, splits them into overlapping chunks, embeds the chunks
//! into a throwaway in-memory index and answers a question from the most similar chunks.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `video` - Video URL/ID resolution
//! - `captions` - Caption fetching with language fallback
//! - `chunking` - Transcript chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - Per-request vector index
//! - `rag` - Retrieval and answer generation
//! - `progress` - Stage progress signals
//! - `orchestrator` - Pipeline coordination
//! - `config` - Configuration management
//!
//! # Example
//!
//! ```rust,no_run
//! use tubeqa::captions::SubtitleLanguage;
//! use tubeqa::config::Settings;
//! use tubeqa::orchestrator::{Orchestrator, QuestionRequest};
//! use tubeqa::progress::NoopObserver;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let request = QuestionRequest {
//!         video: "https://youtu.be/dQw4w9WgXcQ".to_string(),
//!         language: SubtitleLanguage::English,
//!         question: "What is this video about?".to_string(),
//!     };
//!     let result = orchestrator.answer(&request, &NoopObserver).await?;
//!     println!("{}", result.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod captions;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod progress;
pub mod rag;
pub mod vector_store;
pub mod video;

pub use error::{Result, TubeQaError};
