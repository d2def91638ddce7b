//! Caption retrieval for YouTube videos.
//!
//! A [`CaptionSource`] talks to the captions service; the [`TranscriptFetcher`] applies the
//! language fallback on top of it and produces a [`Transcript`].

mod fetcher;
mod language;
mod youtube;

pub use fetcher::{FetchedTranscript, TranscriptFetcher};
pub use language::SubtitleLanguage;
pub use youtube::YtDlpCaptions;

use crate::video::VideoReference;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single caption line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSnippet {
    /// Caption text.
    pub text: String,
    /// Start offset in seconds.
    pub start_seconds: f64,
    /// Display duration in seconds.
    pub duration_seconds: f64,
}

impl CaptionSnippet {
    pub fn new(text: impl Into<String>, start_seconds: f64, duration_seconds: f64) -> Self {
        Self {
            text: text.into(),
            start_seconds,
            duration_seconds,
        }
    }
}

/// Failure reported by a caption source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptionError {
    /// No captions exist for the requested language.
    #[error("no captions available in the requested language")]
    NoCaptions,

    /// The video is private, deleted or blocked.
    #[error("video unavailable: {0}")]
    VideoUnavailable(String),

    /// Anything else: network, tool or format failures.
    #[error("{0}")]
    Other(String),
}

/// A captions service.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch the ordered caption snippets of a video in one language.
    async fn fetch(
        &self,
        video: &VideoReference,
        language: &str,
    ) -> std::result::Result<Vec<CaptionSnippet>, CaptionError>;
}

/// The captions of one video in one language.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    /// Video ID this transcript belongs to.
    pub video_id: String,
    /// Language code of the captions.
    pub language: String,
    /// Caption snippets in playback order.
    pub snippets: Vec<CaptionSnippet>,
    /// Snippet texts joined with single spaces.
    pub full_text: String,
}

impl Transcript {
    /// Create a transcript from snippets.
    pub fn new(video_id: String, language: String, snippets: Vec<CaptionSnippet>) -> Self {
        let full_text = snippets
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            video_id,
            language,
            snippets,
            full_text,
        }
    }

    /// Length of the full text in characters.
    pub fn char_count(&self) -> usize {
        self.full_text.chars().count()
    }

    /// End of the last snippet, in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.snippets
            .last()
            .map(|s| s.start_seconds + s.duration_seconds)
            .unwrap_or(0.0)
    }

    /// Whether the transcript carries any text.
    pub fn is_blank(&self) -> bool {
        self.full_text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_joins_with_spaces() {
        let transcript = Transcript::new(
            "dQw4w9WgXcQ".to_string(),
            "en".to_string(),
            vec![
                CaptionSnippet::new("We're no strangers", 0.0, 2.5),
                CaptionSnippet::new("to love", 2.5, 1.5),
            ],
        );

        assert_eq!(transcript.full_text, "We're no strangers to love");
        assert_eq!(transcript.char_count(), 26);
        assert_eq!(transcript.duration_seconds(), 4.0);
        assert!(!transcript.is_blank());
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::new("x".to_string(), "en".to_string(), Vec::new());
        assert!(transcript.is_blank());
        assert_eq!(transcript.char_count(), 0);
        assert_eq!(transcript.duration_seconds(), 0.0);
    }
}
