//! Transcript fetching with a single language fallback.

use super::{CaptionError, CaptionSource, Transcript};
use crate::error::{Result, TubeQaError};
use crate::video::VideoReference;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A transcript together with the language that produced it.
#[derive(Debug, Clone)]
pub struct FetchedTranscript {
    pub transcript: Transcript,
    /// Language code that was asked for.
    pub requested_language: String,
    /// Language code the captions were actually fetched in.
    pub used_language: String,
}

impl FetchedTranscript {
    /// Whether the fallback language replaced the requested one.
    pub fn fallback_used(&self) -> bool {
        self.requested_language != self.used_language
    }
}

/// Fetches transcripts, falling back to one other language when the requested
/// language has no captions.
pub struct TranscriptFetcher {
    source: Arc<dyn CaptionSource>,
    fallback_language: String,
}

impl TranscriptFetcher {
    pub fn new(source: Arc<dyn CaptionSource>, fallback_language: impl Into<String>) -> Self {
        Self {
            source,
            fallback_language: fallback_language.into(),
        }
    }

    /// Fetch the transcript of `video` in `language`.
    ///
    /// Only a missing caption track triggers the fallback attempt. An unavailable video or a
    /// transport failure is returned as is.
    #[instrument(skip(self), fields(video = %video))]
    pub async fn fetch(&self, video: &VideoReference, language: &str) -> Result<FetchedTranscript> {
        match self.attempt(video, language).await {
            Ok(transcript) => {
                return Ok(FetchedTranscript {
                    transcript,
                    requested_language: language.to_string(),
                    used_language: language.to_string(),
                })
            }
            Err(CaptionError::NoCaptions) if language != self.fallback_language => {
                warn!(
                    "No '{}' captions for {}, retrying with '{}'",
                    language, video, self.fallback_language
                );
            }
            Err(CaptionError::NoCaptions) => {
                return Err(TubeQaError::CaptionsUnavailable {
                    video_id: video.to_string(),
                    tried: language.to_string(),
                })
            }
            Err(e) => return Err(map_caption_error(video, e)),
        }

        match self.attempt(video, &self.fallback_language).await {
            Ok(transcript) => {
                info!("Using '{}' captions instead of '{}'", self.fallback_language, language);
                Ok(FetchedTranscript {
                    transcript,
                    requested_language: language.to_string(),
                    used_language: self.fallback_language.clone(),
                })
            }
            Err(CaptionError::NoCaptions) => Err(TubeQaError::CaptionsUnavailable {
                video_id: video.to_string(),
                tried: format!("{}, {}", language, self.fallback_language),
            }),
            Err(e) => Err(map_caption_error(video, e)),
        }
    }

    async fn attempt(
        &self,
        video: &VideoReference,
        language: &str,
    ) -> std::result::Result<Transcript, CaptionError> {
        let snippets = self.source.fetch(video, language).await?;
        let transcript = Transcript::new(video.to_string(), language.to_string(), snippets);

        // A track with nothing but blank cues is as good as no track.
        if transcript.is_blank() {
            return Err(CaptionError::NoCaptions);
        }
        Ok(transcript)
    }
}

fn map_caption_error(video: &VideoReference, err: CaptionError) -> TubeQaError {
    match err {
        CaptionError::NoCaptions => TubeQaError::CaptionsUnavailable {
            video_id: video.to_string(),
            tried: String::new(),
        },
        CaptionError::VideoUnavailable(_) => TubeQaError::VideoUnavailable(video.to_string()),
        CaptionError::Other(message) => TubeQaError::external("captions service", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::CaptionSnippet;
    use crate::video::resolve;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned responses per language and records every request.
    struct ScriptedSource {
        responses: HashMap<&'static str, std::result::Result<Vec<CaptionSnippet>, CaptionError>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn new(
            responses: Vec<(&'static str, std::result::Result<Vec<CaptionSnippet>, CaptionError>)>,
        ) -> Arc<Self> {
            Arc::new(Self {
                responses: responses.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CaptionSource for ScriptedSource {
        async fn fetch(
            &self,
            _video: &VideoReference,
            language: &str,
        ) -> std::result::Result<Vec<CaptionSnippet>, CaptionError> {
            self.calls.lock().unwrap().push(language.to_string());
            self.responses
                .get(language)
                .cloned()
                .unwrap_or(Err(CaptionError::NoCaptions))
        }
    }

    fn snippets(texts: &[&str]) -> Vec<CaptionSnippet> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| CaptionSnippet::new(*t, i as f64, 1.0))
            .collect()
    }

    fn video() -> VideoReference {
        resolve("dQw4w9WgXcQ").unwrap()
    }

    #[tokio::test]
    async fn test_requested_language_available() {
        let source = ScriptedSource::new(vec![("fr", Ok(snippets(&["Bonjour", "le monde"])))]);
        let fetcher = TranscriptFetcher::new(source.clone(), "en");

        let fetched = fetcher.fetch(&video(), "fr").await.unwrap();
        assert_eq!(fetched.transcript.full_text, "Bonjour le monde");
        assert_eq!(fetched.used_language, "fr");
        assert!(!fetched.fallback_used());
        assert_eq!(source.calls(), vec!["fr"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_english() {
        let source = ScriptedSource::new(vec![
            ("de", Err(CaptionError::NoCaptions)),
            ("en", Ok(snippets(&["Hello", "world"]))),
        ]);
        let fetcher = TranscriptFetcher::new(source.clone(), "en");

        let fetched = fetcher.fetch(&video(), "de").await.unwrap();
        assert_eq!(fetched.transcript.full_text, "Hello world");
        assert_eq!(fetched.requested_language, "de");
        assert_eq!(fetched.used_language, "en");
        assert!(fetched.fallback_used());
        assert_eq!(source.calls(), vec!["de", "en"]);
    }

    #[tokio::test]
    async fn test_no_captions_in_either_language() {
        let source = ScriptedSource::new(vec![]);
        let fetcher = TranscriptFetcher::new(source.clone(), "en");

        let err = fetcher.fetch(&video(), "ja").await.unwrap_err();
        assert!(matches!(err, TubeQaError::CaptionsUnavailable { .. }));
        assert_eq!(source.calls(), vec!["ja", "en"]);
    }

    #[tokio::test]
    async fn test_english_request_is_not_retried() {
        let source = ScriptedSource::new(vec![]);
        let fetcher = TranscriptFetcher::new(source.clone(), "en");

        let err = fetcher.fetch(&video(), "en").await.unwrap_err();
        assert!(matches!(err, TubeQaError::CaptionsUnavailable { .. }));
        assert_eq!(source.calls(), vec!["en"]);
    }

    #[tokio::test]
    async fn test_unavailable_video_skips_fallback() {
        let source = ScriptedSource::new(vec![(
            "es",
            Err(CaptionError::VideoUnavailable("Private video".to_string())),
        )]);
        let fetcher = TranscriptFetcher::new(source.clone(), "en");

        let err = fetcher.fetch(&video(), "es").await.unwrap_err();
        assert!(matches!(err, TubeQaError::VideoUnavailable(_)));
        assert_eq!(source.calls(), vec!["es"]);
    }

    #[tokio::test]
    async fn test_transport_failure_skips_fallback() {
        let source = ScriptedSource::new(vec![(
            "it",
            Err(CaptionError::Other("connection reset".to_string())),
        )]);
        let fetcher = TranscriptFetcher::new(source.clone(), "en");

        let err = fetcher.fetch(&video(), "it").await.unwrap_err();
        assert!(matches!(err, TubeQaError::ExternalService { .. }));
        assert_eq!(source.calls(), vec!["it"]);
    }

    #[tokio::test]
    async fn test_blank_track_counts_as_missing() {
        let source = ScriptedSource::new(vec![
            ("pt", Ok(snippets(&["", "  "]))),
            ("en", Ok(snippets(&["Fallback text"]))),
        ]);
        let fetcher = TranscriptFetcher::new(source, "en");

        let fetched = fetcher.fetch(&video(), "pt").await.unwrap();
        assert_eq!(fetched.used_language, "en");
    }
}
