//! Embedding provider trait and factory.

use crate::embeddings::providers::{ollama::OllamaProvider, trigram::TrigramProvider};
use crate::types::Vector;
use embset_core::{AppError, AppResult, EmbeddingSettings};
use std::sync::Arc;

/// Trait for embedding providers.
///
/// `embed_batch` must return exactly one vector per input, in input order,
/// with the same dimensionality on every call.
#[async_trait::async_trait]
pub trait EmbeddingProvider<I = String>: Send + Sync + std::fmt::Debug
where
    I: Send + Sync,
{
    /// Get provider name (e.g., "trigram", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple inputs in a batch.
    async fn embed_batch(&self, inputs: &[I]) -> AppResult<Vec<Vector>>;

    /// Generate embedding for a single input (a batch of one).
    async fn embed(&self, input: &I) -> AppResult<Vector> {
        let mut results = self.embed_batch(std::slice::from_ref(input)).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Provider("No embedding returned".to_string()))
    }
}

/// Create a text embedding provider based on configuration.
pub fn create_provider(settings: &EmbeddingSettings) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.provider.as_str() {
        "trigram" => {
            let provider = TrigramProvider::new(settings.dimensions).with_normalize(settings.normalize);
            Ok(Arc::new(provider))
        }

        "ollama" => Ok(Arc::new(OllamaProvider::new(settings)?)),

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: trigram, ollama",
            settings.provider
        ))),
    }
}
