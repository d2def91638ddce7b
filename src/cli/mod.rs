//! CLI module for TubeQA.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::captions::SubtitleLanguage;
use crate::error::TubeQaError;
use clap::{Parser, Subcommand};

/// A failure the command has already shown to the user.
///
/// `main` exits with a failure status for these without printing them again.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Reported(#[from] pub TubeQaError);

/// TubeQA - Ask questions about YouTube videos
///
/// Answers questions from a video's captions using retrieval-augmented generation.
#[derive(Parser, Debug)]
#[command(name = "tubeqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question about a video
    Ask {
        /// YouTube URL or 11-character video ID
        video: String,

        /// The question to ask
        question: String,

        /// Subtitle language, by name or code (e.g. "German" or "de")
        #[arg(short, long, default_value = "English")]
        language: SubtitleLanguage,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Print the transcript chunks the answer was based on
        #[arg(long)]
        show_context: bool,
    },

    /// List supported subtitle languages
    Languages,

    /// Fetch and print a video's transcript
    Transcript {
        /// YouTube URL or 11-character video ID
        video: String,

        /// Subtitle language, by name or code
        #[arg(short, long, default_value = "English")]
        language: SubtitleLanguage,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Start HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_language() {
        let cli = Cli::parse_from([
            "tubeqa",
            "ask",
            "https://youtu.be/dQw4w9WgXcQ",
            "What is this about?",
            "-l",
            "de",
        ]);
        match cli.command {
            Commands::Ask {
                video,
                language,
                show_context,
                ..
            } => {
                assert_eq!(video, "https://youtu.be/dQw4w9WgXcQ");
                assert_eq!(language, SubtitleLanguage::German);
                assert!(!show_context);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_language_defaults_to_english() {
        let cli = Cli::parse_from(["tubeqa", "transcript", "dQw4w9WgXcQ"]);
        match cli.command {
            Commands::Transcript { language, .. } => {
                assert_eq!(language, SubtitleLanguage::English)
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        assert!(Cli::try_parse_from(["tubeqa", "transcript", "dQw4w9WgXcQ", "-l", "klingon"]).is_err());
    }
}
