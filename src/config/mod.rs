//! Configuration module for TubeQA.
//!
//! Handles loading and validating application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts};
pub use settings::{
    CaptionSettings, ChunkingSettings, EmbeddingSettings, GeneralSettings, GenerationSettings,
    HttpSettings, PromptSettings, Settings,
};
