//! Supported subtitle languages.

use serde::Serialize;

/// Subtitle language selectable by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SubtitleLanguage {
    #[default]
    English,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Russian,
    Japanese,
    Korean,
    Chinese,
}

impl SubtitleLanguage {
    /// Every supported language, in display order.
    pub const ALL: [SubtitleLanguage; 10] = [
        SubtitleLanguage::English,
        SubtitleLanguage::Spanish,
        SubtitleLanguage::French,
        SubtitleLanguage::German,
        SubtitleLanguage::Italian,
        SubtitleLanguage::Portuguese,
        SubtitleLanguage::Russian,
        SubtitleLanguage::Japanese,
        SubtitleLanguage::Korean,
        SubtitleLanguage::Chinese,
    ];

    /// ISO 639-1 code used when requesting captions.
    pub fn code(&self) -> &'static str {
        match self {
            SubtitleLanguage::English => "en",
            SubtitleLanguage::Spanish => "es",
            SubtitleLanguage::French => "fr",
            SubtitleLanguage::German => "de",
            SubtitleLanguage::Italian => "it",
            SubtitleLanguage::Portuguese => "pt",
            SubtitleLanguage::Russian => "ru",
            SubtitleLanguage::Japanese => "ja",
            SubtitleLanguage::Korean => "ko",
            SubtitleLanguage::Chinese => "zh",
        }
    }

    /// English display name.
    pub fn name(&self) -> &'static str {
        match self {
            SubtitleLanguage::English => "English",
            SubtitleLanguage::Spanish => "Spanish",
            SubtitleLanguage::French => "French",
            SubtitleLanguage::German => "German",
            SubtitleLanguage::Italian => "Italian",
            SubtitleLanguage::Portuguese => "Portuguese",
            SubtitleLanguage::Russian => "Russian",
            SubtitleLanguage::Japanese => "Japanese",
            SubtitleLanguage::Korean => "Korean",
            SubtitleLanguage::Chinese => "Chinese",
        }
    }

    /// Look up a language by its code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code))
    }
}

impl std::str::FromStr for SubtitleLanguage {
    type Err = String;

    /// Accepts a display name ("German") or a code ("de"), case-insensitive.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s) || l.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Unsupported subtitle language: {} (expected one of: {})",
                    s,
                    Self::ALL
                        .iter()
                        .map(|l| l.code())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

impl std::fmt::Display for SubtitleLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
