//! Stage progress reporting.
//!
//! The orchestrator reports each stage as it starts and finishes; presentation layers decide
//! how to render it.

use serde::Serialize;
use std::sync::Mutex;

/// A step of the question-answering pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    FetchTranscript,
    SplitText,
    EmbedChunks,
    RetrieveContext,
    GenerateAnswer,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 5] = [
        Stage::FetchTranscript,
        Stage::SplitText,
        Stage::EmbedChunks,
        Stage::RetrieveContext,
        Stage::GenerateAnswer,
    ];

    /// Label shown while the stage runs.
    pub fn pending_label(&self) -> &'static str {
        match self {
            Stage::FetchTranscript => "Fetching video transcript...",
            Stage::SplitText => "Splitting transcript into chunks...",
            Stage::EmbedChunks => "Creating vector embeddings...",
            Stage::RetrieveContext => "Retrieving relevant context...",
            Stage::GenerateAnswer => "Generating AI response...",
        }
    }

    /// Label shown once the stage is done.
    pub fn completed_label(&self) -> &'static str {
        match self {
            Stage::FetchTranscript => "Transcript fetched",
            Stage::SplitText => "Text chunks created",
            Stage::EmbedChunks => "Vector embeddings created",
            Stage::RetrieveContext => "Relevant context retrieved",
            Stage::GenerateAnswer => "AI response generated",
        }
    }
}

/// Status of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Completed,
}

/// Receives progress signals for one request.
///
/// All methods default to doing nothing.
pub trait ProgressObserver: Send + Sync {
    /// A stage changed status. `detail` carries a short summary for completed stages.
    fn on_stage(&self, _stage: Stage, _status: StageStatus, _detail: Option<&str>) {}

    /// Captions were fetched in `used` because `requested` had none.
    fn on_language_fallback(&self, _requested: &str, _used: &str) {}

    /// The request failed; any status shown so far should be cleared.
    fn on_reset(&self) {}
}

/// Observer that ignores every signal.
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// A recorded progress signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    Stage {
        stage: Stage,
        status: StageStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    LanguageFallback {
        requested: String,
        used: String,
    },
    Reset,
}

/// Observer that records every signal in order.
#[derive(Debug, Default)]
pub struct StageLog {
    events: Mutex<Vec<ProgressEvent>>,
}

impl StageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.lock().clone()
    }

    /// Stages that reached `Completed`, in order.
    pub fn completed_stages(&self) -> Vec<Stage> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Stage {
                    stage,
                    status: StageStatus::Completed,
                    ..
                } => Some(*stage),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ProgressEvent>> {
        // A poisoned log still holds valid events.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProgressObserver for StageLog {
    fn on_stage(&self, stage: Stage, status: StageStatus, detail: Option<&str>) {
        self.lock().push(ProgressEvent::Stage {
            stage,
            status,
            detail: detail.map(str::to_string),
        });
    }

    fn on_language_fallback(&self, requested: &str, used: &str) {
        self.lock().push(ProgressEvent::LanguageFallback {
            requested: requested.to_string(),
            used: used.to_string(),
        });
    }

    fn on_reset(&self) {
        self.lock().push(ProgressEvent::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_log_records_in_order() {
        let log = StageLog::new();
        log.on_stage(Stage::FetchTranscript, StageStatus::Pending, None);
        log.on_language_fallback("de", "en");
        log.on_stage(Stage::FetchTranscript, StageStatus::Completed, Some("42 characters"));
        log.on_reset();

        let events = log.events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[1],
            ProgressEvent::LanguageFallback {
                requested: "de".to_string(),
                used: "en".to_string()
            }
        );
        assert_eq!(events[3], ProgressEvent::Reset);
        assert_eq!(log.completed_stages(), vec![Stage::FetchTranscript]);
    }

    #[test]
    fn test_event_serialization() {
        let event = ProgressEvent::Stage {
            stage: Stage::EmbedChunks,
            status: StageStatus::Completed,
            detail: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"event": "stage", "stage": "embed_chunks", "status": "completed"})
        );
    }
}
