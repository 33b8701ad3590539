//! Embedding collaborators: Ollama-backed and deterministic hash-based

use async_trait::async_trait;
use glimpse_domain::{Embedder, Embedding, EmbeddingError};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default embedding model
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";

/// Default timeout for embedding requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama embeddings API client.
///
/// Talks to a local Ollama instance's `/api/embeddings` endpoint with
/// retry and exponential backoff.
pub struct OllamaEmbedder {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the Ollama embeddings API
#[derive(Serialize)]
struct OllamaEmbedRequest {
    model: String,
    prompt: String,
}

/// Response from the Ollama embeddings API
#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    /// Create a new embedder for the given endpoint and model.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use glimpse_vision::OllamaEmbedder;
    ///
    /// let embedder = OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text");
    /// ```
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create an embedder against the default local endpoint.
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of retry attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    async fn request_embedding(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let url = format!("{}/api/embeddings", self.endpoint);
        let request_body = OllamaEmbedRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return match response.json::<OllamaEmbedResponse>().await {
                            Ok(body) => Ok(body.embedding),
                            Err(e) => Err(EmbeddingError::Unavailable(format!(
                                "failed to parse response: {}",
                                e
                            ))),
                        };
                    }
                    let status = response.status();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(EmbeddingError::Unavailable(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
                Err(e) => {
                    last_error =
                        Some(EmbeddingError::Unavailable(format!("request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| EmbeddingError::Unavailable("max retries exceeded".to_string())))
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if text.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "empty text cannot be embedded".to_string(),
            ));
        }
        self.request_embedding(text).await
    }
}

/// Deterministic hash-based embedder.
///
/// Generates unit-length vectors by hashing the input with per-dimension
/// seeds. Not semantically meaningful, but deterministic and diverse,
/// which is exactly what offline operation and tests need: identical text
/// maps to an identical vector (cosine 1.0), different text to a
/// different one.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create a hash embedder producing vectors of `dimension` entries.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_with_seed(text: &str, seed: u64) -> f32 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        seed.hash(&mut hasher);
        let hash_value = hasher.finish();

        // Map the hash into [-1, 1]
        let normalized = (hash_value as f64 / u64::MAX as f64) * 2.0 - 1.0;
        normalized as f32
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if text.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "empty text cannot be embedded".to_string(),
            ));
        }

        let mut embedding: Embedding = (0..self.dimension)
            .map(|i| Self::hash_with_seed(text, i as u64))
            .collect();

        // Normalize to unit length for cosine comparison
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        Ok(embedding)
    }
}
