//! YouTube captions via yt-dlp.
//!
//! yt-dlp lists the caption tracks of a video; the chosen track is then downloaded in
//! YouTube's `json3` timed-text format.

use super::{CaptionError, CaptionSnippet, CaptionSource};
use crate::config::{CaptionSettings, Settings};
use crate::error::Result;
use crate::video::VideoReference;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// stderr fragments yt-dlp prints for videos that cannot be watched at all.
const UNAVAILABLE_MARKERS: &[&str] = &[
    "video unavailable",
    "private video",
    "has been removed",
    "has been terminated",
    "not available in your country",
    "members-only",
    "sign in to confirm your age",
    "this video is not available",
];

/// Caption source backed by yt-dlp.
pub struct YtDlpCaptions {
    ytdlp_path: String,
    prefer_manual: bool,
    timeout: Duration,
    http: reqwest::Client,
}

impl YtDlpCaptions {
    pub fn new(settings: &CaptionSettings, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            ytdlp_path: Settings::expand_path(&settings.ytdlp_path)
                .to_string_lossy()
                .into_owned(),
            prefer_manual: settings.prefer_manual,
            timeout,
            http,
        })
    }

    /// Fetch video metadata (including caption tracks) using yt-dlp.
    async fn dump_metadata(&self, video: &VideoReference) -> std::result::Result<Value, CaptionError> {
        let url = video.watch_url();

        let mut command = tokio::process::Command::new(&self.ytdlp_path);
        command
            .args(["--dump-json", "--skip-download", "--no-warnings", url.as_str()])
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                CaptionError::Other(format!(
                    "yt-dlp timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CaptionError::Other(format!("{} not found in PATH", self.ytdlp_path))
                } else {
                    CaptionError::Other(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(&stderr));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| CaptionError::Other(format!("Failed to parse yt-dlp output: {}", e)))
    }

    async fn download_track(&self, track_url: &str) -> std::result::Result<Value, CaptionError> {
        let url = json3_url(track_url)?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CaptionError::Other(format!("Caption download failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptionError::Other(format!(
                "Caption download returned HTTP {}",
                status
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CaptionError::Other(format!("Failed to parse captions: {}", e)))
    }
}

#[async_trait]
impl CaptionSource for YtDlpCaptions {
    #[instrument(skip(self), fields(video = %video))]
    async fn fetch(
        &self,
        video: &VideoReference,
        language: &str,
    ) -> std::result::Result<Vec<CaptionSnippet>, CaptionError> {
        let metadata = self.dump_metadata(video).await?;

        let track_url =
            select_track(&metadata, language, self.prefer_manual).ok_or(CaptionError::NoCaptions)?;
        debug!("Selected caption track for '{}'", language);

        let body = self.download_track(&track_url).await?;
        let snippets = parse_json3(&body);
        debug!("Parsed {} caption snippets", snippets.len());

        Ok(snippets)
    }
}

/// Map a failed yt-dlp run onto the caption failure taxonomy.
fn classify_failure(stderr: &str) -> CaptionError {
    let lower = stderr.to_lowercase();
    if UNAVAILABLE_MARKERS.iter().any(|m| lower.contains(m)) {
        CaptionError::VideoUnavailable(stderr.trim().to_string())
    } else {
        CaptionError::Other(format!("yt-dlp failed: {}", stderr.trim()))
    }
}

/// Pick the caption track URL for `language` from yt-dlp metadata.
///
/// Looks in the uploader's subtitles and the automatic captions (order set by
/// `prefer_manual`), matching the exact language key before regional variants such as
/// `en-US`. Machine translations of another language's track (URLs carrying `tlang`) are
/// not captions in `language` and are skipped.
fn select_track(metadata: &Value, language: &str, prefer_manual: bool) -> Option<String> {
    let groups = if prefer_manual {
        ["subtitles", "automatic_captions"]
    } else {
        ["automatic_captions", "subtitles"]
    };
    let regional_prefix = format!("{}-", language);

    groups.iter().find_map(|group| {
        let tracks = metadata.get(*group)?.as_object()?;

        let exact = tracks.get(language).into_iter();
        let regional = tracks
            .iter()
            .filter(|(key, _)| key.starts_with(&regional_prefix))
            .map(|(_, formats)| formats);

        exact.chain(regional).find_map(|formats| {
            let originals: Vec<&Value> = formats
                .as_array()?
                .iter()
                .filter(|f| f["url"].as_str().is_some_and(|url| !is_translation(url)))
                .collect();

            let preferred = originals
                .iter()
                .find(|f| f["ext"].as_str() == Some("json3"))
                .or_else(|| originals.first())?;

            preferred["url"].as_str().map(str::to_string)
        })
    })
}

/// Whether a timed-text URL asks YouTube to machine-translate the track.
fn is_translation(track_url: &str) -> bool {
    match url::Url::parse(track_url) {
        Ok(url) => url.query_pairs().any(|(k, _)| k == "tlang"),
        // An unparseable URL cannot be downloaded either.
        Err(_) => true,
    }
}

/// Force the `json3` format on a timed-text URL.
fn json3_url(track_url: &str) -> std::result::Result<url::Url, CaptionError> {
    let mut url = url::Url::parse(track_url)
        .map_err(|e| CaptionError::Other(format!("Invalid caption URL: {}", e)))?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");

    Ok(url)
}

/// Turn a `json3` timed-text document into snippets, skipping blank cues.
fn parse_json3(body: &Value) -> Vec<CaptionSnippet> {
    let Some(events) = body["events"].as_array() else {
        return Vec::new();
    };

    events
        .iter()
        .filter_map(|event| {
            let segs = event["segs"].as_array()?;
            let text: String = segs.iter().filter_map(|seg| seg["utf8"].as_str()).collect();
            let text = text.trim();
            if text.is_empty() {
                return None;
            }

            let start_ms = event["tStartMs"].as_f64().unwrap_or(0.0);
            let duration_ms = event["dDurationMs"].as_f64().unwrap_or(0.0);
            Some(CaptionSnippet::new(text, start_ms / 1000.0, duration_ms / 1000.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> Value {
        json!({
            "id": "dQw4w9WgXcQ",
            "subtitles": {
                "en-GB": [
                    {"ext": "vtt", "url": "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en-GB&fmt=vtt"},
                    {"ext": "json3", "url": "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en-GB&fmt=json3"}
                ]
            },
            "automatic_captions": {
                "en": [
                    {"ext": "json3", "url": "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en&kind=asr&fmt=json3"}
                ],
                "fr": [
                    {"ext": "srv1", "url": "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=fr&kind=asr&fmt=srv1"}
                ]
            }
        })
    }

    #[test]
    fn test_manual_regional_track_preferred() {
        let url = select_track(&metadata(), "en", true).unwrap();
        assert!(url.contains("lang=en-GB"));
        assert!(url.contains("fmt=json3"));
    }

    #[test]
    fn test_automatic_track_preferred_when_configured() {
        let url = select_track(&metadata(), "en", false).unwrap();
        assert!(url.contains("kind=asr"));
    }

    #[test]
    fn test_falls_back_to_first_format() {
        let url = select_track(&metadata(), "fr", true).unwrap();
        assert!(url.contains("fmt=srv1"));

        let rewritten = json3_url(&url).unwrap();
        let fmts: Vec<_> = rewritten
            .query_pairs()
            .filter(|(k, _)| k == "fmt")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(fmts, vec!["json3"]);
        assert!(rewritten.as_str().contains("lang=fr"));
    }

    #[test]
    fn test_missing_language() {
        assert_eq!(select_track(&metadata(), "ja", true), None);
        assert_eq!(select_track(&json!({}), "en", true), None);
    }

    #[test]
    fn test_translated_tracks_are_not_captions() {
        // English ASR only; yt-dlp also lists machine translations of it.
        let meta = json!({
            "subtitles": {},
            "automatic_captions": {
                "en": [
                    {"ext": "json3", "url": "https://www.youtube.com/api/timedtext?v=x&lang=en&kind=asr&fmt=json3"}
                ],
                "en-orig": [
                    {"ext": "json3", "url": "https://www.youtube.com/api/timedtext?v=x&lang=en&kind=asr&fmt=json3"}
                ],
                "de": [
                    {"ext": "json3", "url": "https://www.youtube.com/api/timedtext?v=x&lang=en&kind=asr&tlang=de&fmt=json3"},
                    {"ext": "vtt", "url": "https://www.youtube.com/api/timedtext?v=x&lang=en&kind=asr&tlang=de&fmt=vtt"}
                ],
                "de-DE": [
                    {"ext": "json3", "url": "https://www.youtube.com/api/timedtext?v=x&lang=en&kind=asr&tlang=de-DE&fmt=json3"}
                ]
            }
        });

        assert_eq!(select_track(&meta, "de", true), None);
        assert_eq!(select_track(&meta, "de", false), None);

        let url = select_track(&meta, "en", true).unwrap();
        assert!(!url.contains("tlang"));
    }

    #[test]
    fn test_original_format_chosen_over_translation() {
        let meta = json!({
            "automatic_captions": {
                "fr": [
                    {"ext": "json3", "url": "https://www.youtube.com/api/timedtext?v=x&lang=en&tlang=fr&fmt=json3"},
                    {"ext": "srv1", "url": "https://www.youtube.com/api/timedtext?v=x&lang=fr&kind=asr&fmt=srv1"}
                ]
            }
        });

        let url = select_track(&meta, "fr", true).unwrap();
        assert!(url.contains("fmt=srv1"));
        assert!(is_translation("https://www.youtube.com/api/timedtext?v=x&tlang=fr"));
        assert!(!is_translation("https://www.youtube.com/api/timedtext?v=x&lang=fr"));
    }

    #[test]
    fn test_parse_json3() {
        let body = json!({
            "events": [
                {"tStartMs": 0, "dDurationMs": 1500, "segs": [{"utf8": "Never gonna "}, {"utf8": "give you up"}]},
                {"tStartMs": 1500, "dDurationMs": 10, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 1600},
                {"tStartMs": 2000, "dDurationMs": 2000, "segs": [{"utf8": " never gonna let you down "}]}
            ]
        });

        let snippets = parse_json3(&body);
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].text, "Never gonna give you up");
        assert_eq!(snippets[0].duration_seconds, 1.5);
        assert_eq!(snippets[1].text, "never gonna let you down");
        assert_eq!(snippets[1].start_seconds, 2.0);
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(
            classify_failure("ERROR: [youtube] abc: Private video. Sign in if you've been granted access"),
            CaptionError::VideoUnavailable(_)
        ));
        assert!(matches!(
            classify_failure("ERROR: [youtube] abc: Video unavailable"),
            CaptionError::VideoUnavailable(_)
        ));
        assert!(matches!(
            classify_failure("ERROR: Unable to download webpage: timed out"),
            CaptionError::Other(_)
        ));
    }
}
