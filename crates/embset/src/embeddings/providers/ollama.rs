//! Ollama Embedding Provider
//!
//! Embeds text through a local Ollama server using its batch endpoint
//! (`POST /api/embed`), e.g. with `all-minilm` or `nomic-embed-text`.
//!
//! # Features
//! - One HTTP request per batch, order preserved
//! - Retry with exponential backoff inside the provider
//! - Dimension checking on every returned vector
//! - Optional L2 normalization of returned vectors
//!
//! # Example
//! ```no_run
//! use embset::embeddings::{EmbeddingProvider, OllamaProvider};
//! use embset_core::EmbeddingSettings;
//!
//! # async fn run() -> embset_core::AppResult<()> {
//! let settings = EmbeddingSettings {
//!     provider: "ollama".to_string(),
//!     model: "nomic-embed-text".to_string(),
//!     dimensions: 768,
//!     ..Default::default()
//! };
//!
//! let provider = OllamaProvider::new(&settings)?;
//! let embedding = provider.embed(&"Hello world".to_string()).await?;
//! assert_eq!(embedding.len(), 768);
//! # Ok(())
//! # }
//! ```

use crate::embeddings::EmbeddingProvider;
use crate::similarity::normalize;
use crate::types::Vector;
use async_trait::async_trait;
use embset_core::{AppError, AppResult, EmbeddingSettings};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Ollama API endpoint for embeddings
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const EMBED_ENDPOINT: &str = "/api/embed";

/// Initial backoff duration in milliseconds
const INITIAL_BACKOFF_MS: u64 = 100;

/// Ollama embedding provider using the local HTTP API
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    dimensions: usize,
    max_retries: u32,
    normalize: bool,
}

/// Request payload for the batch embeddings API
#[derive(Debug, Clone, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

/// Response from the batch embeddings API
#[derive(Debug, Clone, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vector>,
}

/// Error response from Ollama API
#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl OllamaProvider {
    /// Create a provider from settings.
    ///
    /// No request is made here; use [`OllamaProvider::verify_connection`]
    /// to check that the server and model are available.
    pub fn new(settings: &EmbeddingSettings) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::Provider(format!("Failed to create HTTP client for Ollama: {}", e))
            })?;

        let base_url = settings
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            dimensions: settings.dimensions,
            max_retries: settings.max_retries.max(1),
            normalize: settings.normalize,
        })
    }

    /// Verify Ollama connection and model availability
    #[instrument(skip(self), fields(model = %self.model))]
    pub async fn verify_connection(&self) -> AppResult<()> {
        debug!("Verifying Ollama connection at {}", self.base_url);

        self.embed_batch(&["test connection".to_string()])
            .await
            .map(|_| ())
            .map_err(|e| {
                AppError::Provider(format!(
                    "Ollama not available at {} ({}). Ensure Ollama is running and model '{}' is installed. Run: ollama pull {}",
                    self.base_url, e, self.model, self.model
                ))
            })
    }

    /// Embed a batch with retry logic
    async fn embed_with_retries(&self, inputs: &[String]) -> AppResult<Vec<Vector>> {
        let mut attempt = 0;

        loop {
            match self.embed_once(inputs).await {
                Ok(embeddings) => return Ok(embeddings),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_retries {
                        return Err(e);
                    }

                    let backoff_ms = INITIAL_BACKOFF_MS * 2_u64.pow(attempt);
                    warn!(
                        "Embedding failed (attempt {}/{}), retrying in {}ms: {}",
                        attempt, self.max_retries, backoff_ms, e
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
            }
        }
    }

    /// Embed a batch (no retries)
    async fn embed_once(&self, inputs: &[String]) -> AppResult<Vec<Vector>> {
        let url = format!("{}{}", self.base_url, EMBED_ENDPOINT);
        let request = EmbedRequest {
            model: &self.model,
            input: inputs,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to send request to Ollama: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|body| body.error)
                .unwrap_or(error_text);

            return Err(AppError::Provider(format!(
                "Ollama API error ({}): {}",
                status, message
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to parse Ollama response: {}", e)))?;

        self.check_response(inputs.len(), body.embeddings)
    }

    fn check_response(&self, expected: usize, mut embeddings: Vec<Vector>) -> AppResult<Vec<Vector>> {
        if embeddings.len() != expected {
            return Err(AppError::Provider(format!(
                "Ollama returned {} embeddings for {} inputs",
                embeddings.len(),
                expected
            )));
        }

        if let Some(bad) = embeddings.iter().find(|e| e.len() != self.dimensions) {
            return Err(AppError::Provider(format!(
                "Unexpected embedding dimensions: got {}, expected {}",
                bad.len(),
                self.dimensions
            )));
        }

        if self.normalize {
            embeddings.iter_mut().for_each(|e| normalize(e));
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[instrument(skip(self, inputs), fields(batch_size = inputs.len(), provider = "ollama", model = %self.model))]
    async fn embed_batch(&self, inputs: &[String]) -> AppResult<Vec<Vector>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Embedding batch of {} texts", inputs.len());
        self.embed_with_retries(inputs).await
    }
}
