//! HTTP API server for integration with other systems.
//!
//! Exposes question answering over REST. Every request runs its own pipeline with its own
//! index; only the API clients are shared.

use crate::captions::SubtitleLanguage;
use crate::cli::preflight::{self, Operation};
use crate::cli::{Output, Reported};
use crate::config::Settings;
use crate::error::{ErrorCategory, TubeQaError};
use crate::orchestrator::{AnswerResult, Orchestrator, QuestionRequest};
use crate::progress::{ProgressEvent, StageLog};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubeqa doctor' for detailed diagnostics.");
        return Err(Reported(e).into());
    }

    let state = Arc::new(AppState {
        orchestrator: Orchestrator::new(settings)?,
    });

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("TubeQA API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Languages", "GET  /languages");
    Output::kv("Ask", "POST /ask");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/languages", get(languages))
        .route("/ask", post(ask))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    /// YouTube URL or video ID
    #[serde(default)]
    video: String,
    #[serde(default)]
    question: String,
    /// Language name or code; English when absent
    #[serde(default)]
    language: Option<String>,
}

#[derive(Serialize)]
struct AskResponse {
    #[serde(flatten)]
    result: AnswerResult,
    stages: Vec<ProgressEvent>,
}

#[derive(Serialize)]
struct LanguageInfo {
    code: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    category: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stages: Vec<ProgressEvent>,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn languages() -> impl IntoResponse {
    Json(
        SubtitleLanguage::ALL
            .iter()
            .map(|l| LanguageInfo {
                code: l.code(),
                name: l.name(),
            })
            .collect::<Vec<_>>(),
    )
}

async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return error_response(TubeQaError::InvalidInput(rejection.body_text()), Vec::new())
        }
    };

    let language = match req.language.as_deref().map(str::parse::<SubtitleLanguage>) {
        None => SubtitleLanguage::default(),
        Some(Ok(language)) => language,
        Some(Err(e)) => return error_response(TubeQaError::InvalidInput(e), Vec::new()),
    };

    let request = QuestionRequest {
        video: req.video,
        language,
        question: req.question,
    };

    let log = StageLog::new();
    match state.orchestrator.answer(&request, &log).await {
        Ok(result) => {
            info!("Answered question about {}", result.video);
            Json(AskResponse {
                result,
                stages: log.events(),
            })
            .into_response()
        }
        Err(e) => error_response(e, log.events()),
    }
}

fn error_response(err: TubeQaError, stages: Vec<ProgressEvent>) -> Response {
    let category = err.category();
    (
        status_for(&err),
        Json(ErrorResponse {
            error: err.to_string(),
            category: category.as_str(),
            message: category.user_message(),
            stages,
        }),
    )
        .into_response()
}

/// HTTP status for a pipeline error.
fn status_for(err: &TubeQaError) -> StatusCode {
    match err.category() {
        ErrorCategory::MissingInput | ErrorCategory::InvalidVideoReference => StatusCode::BAD_REQUEST,
        ErrorCategory::VideoUnavailable => StatusCode::NOT_FOUND,
        ErrorCategory::NoCaptions => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCategory::Failure => match err {
            TubeQaError::ExternalService { .. } | TubeQaError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}
