//! Answer generation.

use super::context::format_context;
use crate::config::{GenerationSettings, Prompts};
use crate::error::{Result, TubeQaError};
use crate::openai::create_client_with_timeout;
use crate::vector_store::SearchResult;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

const SERVICE: &str = "language model";

/// A text completion service.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a single prompt.
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String>;

    /// Model identifier, for display.
    fn model_name(&self) -> &str;
}

/// Chat-completions backed language model.
pub struct OpenAIChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIChatModel {
    pub fn new(model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAIChatModel {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| TubeQaError::external(SERVICE, e.to_string()))?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(temperature)
            .build()
            .map_err(|e| TubeQaError::external(SERVICE, e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| TubeQaError::external(SERVICE, e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| TubeQaError::external(SERVICE, "empty response"))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Builds the grounded prompt and asks the model for an answer.
pub struct AnswerGenerator {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
    temperature: f32,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Prompts, settings: &GenerationSettings) -> Self {
        Self {
            model,
            prompts,
            temperature: settings.temperature,
        }
    }

    /// Render the answer prompt for a context block and question.
    pub fn build_prompt(&self, context: &str, question: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context.to_string());
        vars.insert("question".to_string(), question.to_string());

        self.prompts
            .render_with_custom(&self.prompts.answer.template, &vars)
    }

    /// Answer `question` from the retrieved chunks.
    pub async fn generate(&self, retrieved: &[SearchResult], question: &str) -> Result<String> {
        let prompt = self.build_prompt(&format_context(retrieved), question);
        info!(
            "Generating answer with {} from {} chunks",
            self.model.model_name(),
            retrieved.len()
        );

        let answer = self.model.complete(&prompt, self.temperature).await?;
        let answer = answer.trim().to_string();
        if answer.is_empty() {
            return Err(TubeQaError::external(SERVICE, "empty response"));
        }

        debug!("Generated answer of {} characters", answer.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::TextChunk;
    use std::sync::Mutex;

    /// Echoes a fixed answer and remembers the prompt and temperature it saw.
    struct EchoModel {
        answer: String,
        seen: Mutex<Option<(String, f32)>>,
    }

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn complete(&self, prompt: &str, temperature: f32) -> Result<String> {
            *self.seen.lock().unwrap() = Some((prompt.to_string(), temperature));
            Ok(self.answer.clone())
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn result(content: &str) -> SearchResult {
        SearchResult {
            chunk: TextChunk {
                order: 0,
                start: 0,
                end: content.len(),
                content: content.to_string(),
            },
            score: 1.0,
        }
    }

    #[tokio::test]
    async fn test_prompt_contains_context_and_question() {
        let model = Arc::new(EchoModel {
            answer: "  The video is about music.\n".to_string(),
            seen: Mutex::new(None),
        });
        let generator =
            AnswerGenerator::new(model.clone(), Prompts::default(), &GenerationSettings::default());

        let answer = generator
            .generate(&[result("first chunk"), result("second chunk")], "What is it about?")
            .await
            .unwrap();
        assert_eq!(answer, "The video is about music.");

        let (prompt, temperature) = model.seen.lock().unwrap().clone().unwrap();
        assert_eq!(temperature, 0.0);
        assert!(prompt.contains("first chunk\n\nsecond chunk"));
        assert!(prompt.contains("Question: What is it about?"));
        assert!(prompt.contains("based ONLY on the provided transcript context"));
        assert!(!prompt.contains("{{"));
    }

    #[tokio::test]
    async fn test_blank_answer_is_an_error() {
        let model = Arc::new(EchoModel {
            answer: "   ".to_string(),
            seen: Mutex::new(None),
        });
        let generator = AnswerGenerator::new(model, Prompts::default(), &GenerationSettings::default());

        let err = generator.generate(&[result("chunk")], "Why?").await.unwrap_err();
        assert!(matches!(err, TubeQaError::ExternalService { .. }));
    }
}
