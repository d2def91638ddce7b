//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and credentials are available
//! before starting a pipeline that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, TubeQaError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Answering needs captions, embeddings and a language model.
    Ask,
    /// Fetching a transcript only needs yt-dlp.
    Transcript,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ask => {
            check_api_key()?;
            check_tool(&settings.captions.ytdlp_path)?;
        }
        Operation::Transcript => {
            check_tool(&settings.captions.ytdlp_path)?;
        }
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        Ok(_) => Err(TubeQaError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(TubeQaError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...' or add it to .env"
                .to_string(),
        )),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    let program = Settings::expand_path(name);
    match Command::new(&program).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(TubeQaError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TubeQaError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(TubeQaError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
