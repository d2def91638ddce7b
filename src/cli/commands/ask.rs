//! Ask command implementation.

use crate::captions::SubtitleLanguage;
use crate::cli::output::format_count;
use crate::cli::preflight::{self, Operation};
use crate::cli::{Output, Reported};
use crate::config::Settings;
use crate::orchestrator::{AnswerResult, Orchestrator, QuestionRequest};
use crate::progress::{ProgressObserver, Stage, StageStatus};
use crate::rag::TOP_K;
use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar};
use std::collections::HashMap;
use std::sync::Mutex;

/// Renders pipeline stages as terminal spinners.
struct CliProgress {
    multi: MultiProgress,
    bars: Mutex<HashMap<Stage, ProgressBar>>,
}

impl CliProgress {
    fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn bars(&self) -> std::sync::MutexGuard<'_, HashMap<Stage, ProgressBar>> {
        self.bars.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProgressObserver for CliProgress {
    fn on_stage(&self, stage: Stage, status: StageStatus, detail: Option<&str>) {
        let mut bars = self.bars();
        match status {
            StageStatus::Pending => {
                let pb = self.multi.add(Output::spinner(stage.pending_label()));
                bars.insert(stage, pb);
            }
            StageStatus::Completed => {
                if let Some(pb) = bars.get(&stage) {
                    let msg = match detail {
                        Some(d) => format!("{} ({})", stage.completed_label(), d),
                        None => stage.completed_label().to_string(),
                    };
                    Output::finish_spinner(pb, &msg);
                }
            }
        }
    }

    fn on_language_fallback(&self, requested: &str, used: &str) {
        let name = |code: &str| {
            SubtitleLanguage::from_code(code)
                .map(|l| l.name().to_string())
                .unwrap_or_else(|| code.to_string())
        };
        let msg = format!(
            "No {} subtitles found, using {} instead",
            name(requested),
            name(used)
        );
        // Print above the spinners so the line is not overwritten
        if self.multi.println(format!("{} {}", console::style(">>").yellow().bold(), msg)).is_err() {
            Output::warning(&msg);
        }
    }

    fn on_reset(&self) {
        for (_, pb) in self.bars().drain() {
            pb.finish_and_clear();
        }
        let _ = self.multi.clear();
    }
}

/// Run the ask command.
pub async fn run_ask(
    video: &str,
    question: &str,
    language: SubtitleLanguage,
    model: Option<String>,
    show_context: bool,
    mut settings: Settings,
) -> Result<()> {
    let request = QuestionRequest {
        video: video.to_string(),
        language,
        question: question.to_string(),
    };

    // Bad input is reported before any tool or credential checks
    if let Err(e) = Orchestrator::prepare(&request) {
        Output::error(e.category().user_message());
        Output::info(&format!("Details: {}", e));
        return Err(Reported(e).into());
    }

    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubeqa doctor' for detailed diagnostics.");
        return Err(Reported(e).into());
    }

    if let Some(model) = model {
        settings.generation.model = model;
    }

    let orchestrator = Orchestrator::new(settings)?;

    let progress = CliProgress::new();
    match orchestrator.answer(&request, &progress).await {
        Ok(result) => {
            print_answer(&result, show_context);
            Ok(())
        }
        Err(e) => {
            Output::error(e.category().user_message());
            Output::info(&format!("Details: {}", e));
            Err(Reported(e).into())
        }
    }
}

fn print_answer(result: &AnswerResult, show_context: bool) {
    Output::header("Answer");
    println!("\n{}\n", result.answer);

    if show_context {
        Output::header(&format!("Context (top {})", TOP_K));
        for (i, source) in result.sources.iter().enumerate() {
            Output::context_chunk(i + 1, source.chunk.order, source.score, &source.chunk.content);
        }
        println!();
    }

    let details = &result.details;
    Output::header("Processing Details");
    Output::kv("Video ID", &details.video_id);
    Output::kv("Language", &details.language);
    Output::kv(
        "Transcript Length",
        &format!("{} characters", format_count(details.transcript_length)),
    );
    Output::kv("Text Chunks", &details.chunk_count.to_string());
}
