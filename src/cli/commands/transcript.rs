//! Transcript command implementation.

use crate::captions::SubtitleLanguage;
use crate::cli::output::{format_count, format_duration};
use crate::cli::preflight::{self, Operation};
use crate::cli::{Output, Reported};
use crate::config::Settings;
use crate::error::TubeQaError;
use crate::orchestrator::Orchestrator;
use crate::video;
use anyhow::Result;

/// Fetch a transcript and print its text.
pub async fn run_transcript(video: &str, language: SubtitleLanguage, settings: Settings) -> Result<()> {
    let Some(reference) = video::resolve(video) else {
        let err = TubeQaError::UnresolvableVideoReference(video.to_string());
        Output::error(err.category().user_message());
        return Err(Reported(err).into());
    };

    if let Err(e) = preflight::check(Operation::Transcript, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubeqa doctor' for detailed diagnostics.");
        return Err(Reported(e).into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Fetching {} transcript...", language));
    let fetched = match orchestrator.fetch_transcript(&reference, language).await {
        Ok(fetched) => {
            spinner.finish_and_clear();
            fetched
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(e.category().user_message());
            Output::info(&format!("Details: {}", e));
            return Err(Reported(e).into());
        }
    };

    if fetched.fallback_used() {
        Output::warning(&format!(
            "No '{}' subtitles found, using '{}' instead",
            fetched.requested_language, fetched.used_language
        ));
    }

    let transcript = &fetched.transcript;
    eprintln!(
        "{} {} characters, {} captions over {}, {} ({})",
        console::style(">>").cyan().bold(),
        format_count(transcript.char_count()),
        transcript.snippets.len(),
        format_duration(transcript.duration_seconds()),
        reference,
        fetched.used_language
    );
    println!("{}", transcript.full_text);

    Ok(())
}
