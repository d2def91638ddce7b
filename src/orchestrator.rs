//! Pipeline orchestrator for TubeQA.
//!
//! Runs one question through fetch, chunk, embed, retrieve and generate. Every request
//! builds its own index; nothing is shared between requests.

use crate::captions::{
    CaptionSource, FetchedTranscript, SubtitleLanguage, TranscriptFetcher, YtDlpCaptions,
};
use crate::chunking::{Chunker, ChunkingConfig, RecursiveSplitter};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, TubeQaError};
use crate::progress::{ProgressObserver, Stage, StageStatus};
use crate::rag::{AnswerGenerator, LanguageModel, OpenAIChatModel, Retriever};
use crate::vector_store::{build_index, SearchResult};
use crate::video::{self, VideoReference};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A question about a video, as entered by the user.
#[derive(Debug, Clone)]
pub struct QuestionRequest {
    /// Video URL or ID.
    pub video: String,
    /// Preferred subtitle language.
    pub language: SubtitleLanguage,
    /// Free-text question.
    pub question: String,
}

/// Facts about how an answer was produced.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingDetails {
    pub video_id: String,
    /// Display name of the caption language used.
    pub language: String,
    pub language_code: String,
    pub requested_language_code: String,
    pub fallback_used: bool,
    /// Transcript length in characters.
    pub transcript_length: usize,
    pub chunk_count: usize,
}

/// A grounded answer to one question about one video.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    pub video: VideoReference,
    pub question: String,
    pub answer: String,
    pub details: ProcessingDetails,
    /// Chunks the answer was generated from, most relevant first.
    pub sources: Vec<SearchResult>,
}

/// The main orchestrator for the TubeQA pipeline.
pub struct Orchestrator {
    settings: Settings,
    fetcher: TranscriptFetcher,
    chunker: Box<dyn Chunker>,
    embedder: Arc<dyn Embedder>,
    retriever: Retriever,
    generator: AnswerGenerator,
}

impl Orchestrator {
    /// Create an orchestrator talking to yt-dlp and OpenAI.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let timeout = settings.http_timeout();
        let captions: Arc<dyn CaptionSource> =
            Arc::new(YtDlpCaptions::new(&settings.captions, timeout)?);
        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::new(&settings.embedding, timeout)?);
        let model: Arc<dyn LanguageModel> =
            Arc::new(OpenAIChatModel::new(&settings.generation.model, timeout)?);

        info!(
            "Using {} for embeddings and {} for answers",
            settings.embedding.model, settings.generation.model
        );

        Ok(Self::with_components(settings, prompts, captions, embedder, model))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        captions: Arc<dyn CaptionSource>,
        embedder: Arc<dyn Embedder>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        let fetcher = TranscriptFetcher::new(captions, settings.captions.fallback_language.clone());
        let retriever = Retriever::new(embedder.clone());
        let generator = AnswerGenerator::new(model, prompts, &settings.generation);

        Self {
            settings,
            fetcher,
            chunker: Box::new(RecursiveSplitter::new()),
            embedder,
            retriever,
            generator,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Check the request and resolve its video reference. Makes no external calls.
    pub fn prepare(request: &QuestionRequest) -> Result<VideoReference> {
        let video_input = request.video.trim();
        let question = request.question.trim();

        if video_input.is_empty() || question.is_empty() {
            let missing = match (video_input.is_empty(), question.is_empty()) {
                (true, true) => "video URL/ID and question",
                (true, false) => "video URL/ID",
                _ => "question",
            };
            return Err(TubeQaError::InvalidInput(format!("missing {}", missing)));
        }

        video::resolve(video_input)
            .ok_or_else(|| TubeQaError::UnresolvableVideoReference(video_input.to_string()))
    }

    /// Fetch a transcript with the configured language fallback.
    pub async fn fetch_transcript(
        &self,
        video: &VideoReference,
        language: SubtitleLanguage,
    ) -> Result<FetchedTranscript> {
        self.fetcher.fetch(video, language.code()).await
    }

    /// Answer a question about a video.
    ///
    /// On failure the observer is reset before the error is returned, so no stage is left
    /// showing as pending.
    #[instrument(skip(self, request, observer), fields(video = %request.video, language = %request.language))]
    pub async fn answer(
        &self,
        request: &QuestionRequest,
        observer: &dyn ProgressObserver,
    ) -> Result<AnswerResult> {
        let video = Self::prepare(request)?;

        match self.run(&video, request, observer).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Pipeline failed for {}: {}", video, e);
                observer.on_reset();
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        video: &VideoReference,
        request: &QuestionRequest,
        observer: &dyn ProgressObserver,
    ) -> Result<AnswerResult> {
        let question = request.question.trim();

        // Fetch
        observer.on_stage(Stage::FetchTranscript, StageStatus::Pending, None);
        let fetched = self.fetch_transcript(video, request.language).await?;
        if fetched.fallback_used() {
            observer.on_language_fallback(&fetched.requested_language, &fetched.used_language);
        }
        let transcript_length = fetched.transcript.char_count();
        observer.on_stage(
            Stage::FetchTranscript,
            StageStatus::Completed,
            Some(&format!("{} characters", transcript_length)),
        );

        // Chunk
        observer.on_stage(Stage::SplitText, StageStatus::Pending, None);
        let config = ChunkingConfig::from(&self.settings.chunking);
        let chunks = self.chunker.chunk(&fetched.transcript.full_text, &config)?;
        observer.on_stage(
            Stage::SplitText,
            StageStatus::Completed,
            Some(&format!("{} chunks", chunks.len())),
        );

        // Embed
        observer.on_stage(Stage::EmbedChunks, StageStatus::Pending, None);
        let index = build_index(self.embedder.as_ref(), &chunks).await?;
        observer.on_stage(Stage::EmbedChunks, StageStatus::Completed, None);

        // Retrieve
        observer.on_stage(Stage::RetrieveContext, StageStatus::Pending, None);
        let sources = self.retriever.retrieve(&index, question).await?;
        observer.on_stage(
            Stage::RetrieveContext,
            StageStatus::Completed,
            Some(&format!("{} chunks", sources.len())),
        );

        // Generate
        observer.on_stage(Stage::GenerateAnswer, StageStatus::Pending, None);
        let answer = self.generator.generate(&sources, question).await?;
        observer.on_stage(Stage::GenerateAnswer, StageStatus::Completed, None);

        let language = SubtitleLanguage::from_code(&fetched.used_language)
            .map(|l| l.name().to_string())
            .unwrap_or_else(|| fetched.used_language.clone());

        Ok(AnswerResult {
            video: video.clone(),
            question: question.to_string(),
            answer,
            details: ProcessingDetails {
                video_id: video.to_string(),
                language,
                language_code: fetched.used_language.clone(),
                requested_language_code: fetched.requested_language.clone(),
                fallback_used: fetched.fallback_used(),
                transcript_length,
                chunk_count: chunks.len(),
            },
            sources,
        })
    }
}
