//! OpenAI embeddings implementation.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{Result, TubeQaError};
use crate::openai::create_client_with_timeout;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

const SERVICE: &str = "embedding service";

/// OpenAI has a limit on batch size.
const BATCH_SIZE: usize = 100;

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder from settings.
    pub fn new(settings: &EmbeddingSettings, timeout: Duration) -> Result<Self> {
        Self::with_config(&settings.model, settings.dimensions as usize, timeout)
    }

    /// Create an embedder with a custom model and dimensions.
    pub fn with_config(model: &str, dimensions: usize, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            model: model.to_string(),
            dimensions,
        })
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| TubeQaError::external(SERVICE, "empty embedding response"))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .input(EmbeddingInput::StringArray(batch.to_vec()))
                .dimensions(self.dimensions as u32)
                .build()
                .map_err(|e| TubeQaError::external(SERVICE, format!("invalid request: {}", e)))?;

            let response = self
                .client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| TubeQaError::external(SERVICE, e.to_string()))?;

            if response.data.len() != batch.len() {
                return Err(TubeQaError::external(
                    SERVICE,
                    format!(
                        "expected {} embeddings, received {}",
                        batch.len(),
                        response.data.len()
                    ),
                ));
            }

            // Sort by index to ensure correct order
            let mut embeddings = response.data;
            embeddings.sort_by_key(|e| e.index);
            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = OpenAIEmbedder::new(&EmbeddingSettings::default(), Duration::from_secs(5))
            .unwrap();
        assert_eq!(embedder.dimensions(), 1536);

        let embedder =
            OpenAIEmbedder::with_config("text-embedding-3-large", 3072, Duration::from_secs(5))
                .unwrap();
        assert_eq!(embedder.dimensions(), 3072);
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_request() {
        let embedder = OpenAIEmbedder::new(&EmbeddingSettings::default(), Duration::from_secs(5))
            .unwrap();
        let embeddings = embedder.embed_batch(&[]).await.unwrap();
        assert!(embeddings.is_empty());
    }
}
