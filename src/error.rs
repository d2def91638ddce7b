//! Error types for TubeQA.

use thiserror::Error;

/// Library-level error type for TubeQA operations.
#[derive(Error, Debug)]
pub enum TubeQaError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not extract a video ID from: {0}")]
    UnresolvableVideoReference(String),

    #[error("No captions available for video {video_id} (tried: {tried})")]
    CaptionsUnavailable { video_id: String, tried: String },

    #[error("Video {0} is unavailable")]
    VideoUnavailable(String),

    #[error("{service} failed: {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),
}

impl TubeQaError {
    /// Wrap a failure reported by an external service.
    pub fn external(service: &'static str, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service,
            message: message.into(),
        }
    }

    /// The user-facing category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            TubeQaError::InvalidInput(_) => ErrorCategory::MissingInput,
            TubeQaError::UnresolvableVideoReference(_) => ErrorCategory::InvalidVideoReference,
            TubeQaError::CaptionsUnavailable { .. } => ErrorCategory::NoCaptions,
            TubeQaError::VideoUnavailable(_) => ErrorCategory::VideoUnavailable,
            _ => ErrorCategory::Failure,
        }
    }
}

/// How an error is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    MissingInput,
    InvalidVideoReference,
    NoCaptions,
    VideoUnavailable,
    Failure,
}

impl ErrorCategory {
    /// Short machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::MissingInput => "missing_input",
            ErrorCategory::InvalidVideoReference => "invalid_video_reference",
            ErrorCategory::NoCaptions => "no_captions",
            ErrorCategory::VideoUnavailable => "video_unavailable",
            ErrorCategory::Failure => "failure",
        }
    }

    /// Message shown to the user for this category.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCategory::MissingInput => {
                "Please provide both a YouTube URL/ID and a question."
            }
            ErrorCategory::InvalidVideoReference => {
                "Invalid YouTube URL or video ID. Please check your input."
            }
            ErrorCategory::NoCaptions => {
                "No subtitles available for this video. Please try a video with captions enabled."
            }
            ErrorCategory::VideoUnavailable => {
                "Video is unavailable or private. Please check the video URL."
            }
            ErrorCategory::Failure => "An error occurred while processing the request.",
        }
    }
}

/// Result type alias for TubeQA operations.
pub type Result<T> = std::result::Result<T, TubeQaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            TubeQaError::InvalidInput("question".into()).category(),
            ErrorCategory::MissingInput
        );
        assert_eq!(
            TubeQaError::CaptionsUnavailable {
                video_id: "dQw4w9WgXcQ".into(),
                tried: "fr, en".into(),
            }
            .category(),
            ErrorCategory::NoCaptions
        );
        assert_eq!(
            TubeQaError::external("embedding", "rate limited").category(),
            ErrorCategory::Failure
        );
        assert_eq!(
            TubeQaError::Config("bad".into()).category(),
            ErrorCategory::Failure
        );
    }

    #[test]
    fn test_external_message_is_kept() {
        let err = TubeQaError::external("language model", "quota exceeded");
        assert_eq!(err.to_string(), "language model failed: quota exceeded");
    }
}
