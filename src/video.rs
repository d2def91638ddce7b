//! Video reference resolution.
//!
//! Turns raw user input (a bare video ID or a YouTube URL) into a [`VideoReference`].

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Length of a YouTube video ID.
pub const VIDEO_ID_LEN: usize = 11;

/// URL shapes tried in order. The first capture wins.
static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([a-zA-Z0-9_-]{11})",
        r"youtube\.com/watch\?.*v=([a-zA-Z0-9_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex"))
    .collect()
});

/// A validated 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoReference(String);

impl VideoReference {
    /// The video ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve a bare video ID or a YouTube URL.
///
/// Input of exactly 11 ASCII alphanumeric characters is returned unchanged. Otherwise the
/// known URL shapes (`watch?v=`, `youtu.be/`, `embed/`, `watch?...&v=`) are matched in
/// order. Returns `None` when nothing matches.
///
/// Matching is pattern based: a malformed URL that happens to contain an 11-character token
/// in one of those positions resolves to that token.
pub fn resolve(input: &str) -> Option<VideoReference> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.len() == VIDEO_ID_LEN && input.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Some(VideoReference(input.to_string()));
    }

    URL_PATTERNS.iter().find_map(|re| {
        re.captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| VideoReference(m.as_str().to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(input: &str) -> Option<String> {
        resolve(input).map(|v| v.as_str().to_string())
    }

    #[test]
    fn test_bare_id_passthrough() {
        assert_eq!(id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
        assert_eq!(id("abcdefghijk"), Some("abcdefghijk".to_string()));
        assert_eq!(id("01234567890"), Some("01234567890".to_string()));
    }

    #[test]
    fn test_url_formats() {
        for url in [
            "https://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ",
            "youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?list=PL123&index=2&v=dQw4w9WgXcQ",
        ] {
            assert_eq!(id(url), Some("dQw4w9WgXcQ".to_string()), "{}", url);
        }
    }

    #[test]
    fn test_ids_with_dash_and_underscore_from_urls() {
        assert_eq!(
            id("https://youtu.be/a_b-c_d-e_f"),
            Some("a_b-c_d-e_f".to_string())
        );
    }

    #[test]
    fn test_unresolvable_input() {
        assert_eq!(id("not a url"), None);
        assert_eq!(id(""), None);
        assert_eq!(id("   "), None);
        assert_eq!(id("https://vimeo.com/123456789"), None);
        assert_eq!(id("https://youtu.be/short"), None);
        assert_eq!(id("abc_def-ghi"), None);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(id("  dQw4w9WgXcQ\n"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_watch_url() {
        let video = resolve("dQw4w9WgXcQ").unwrap();
        assert_eq!(video.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(video.to_string(), "dQw4w9WgXcQ");
    }
}
