//! Languages command implementation.

use crate::captions::SubtitleLanguage;
use crate::cli::Output;

/// List supported subtitle languages.
pub fn run_languages() {
    Output::header("Supported Languages");
    println!();
    for language in SubtitleLanguage::ALL {
        Output::list_item(&format!("{} ({})", language.name(), language.code()));
    }
}
