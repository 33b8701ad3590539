//! Ollama answer-chain implementation
//!
//! Talks to a local Ollama instance's generate API with retry and
//! exponential backoff.

use crate::{AnswerChain, LlmError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama-backed answer chain for local inference.
pub struct OllamaChain {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from the Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaChain {
    /// Create a chain for the given endpoint and model.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use glimpse_llm::OllamaChain;
    ///
    /// let chain = OllamaChain::new("http://localhost:11434", "llama2");
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

    /// Create a chain against the default local endpoint.
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of retry attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Assemble the context + question prompt.
    fn build_prompt(context: &str, question: &str) -> String {
        if context.trim().is_empty() {
            return format!("Question: {}\nAnswer:", question);
        }
        format!(
            "Use the following context to answer the question.\n\n\
             Context:\n{}\n\nQuestion: {}\nAnswer:",
            context, question
        )
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let request_body = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return match response.json::<OllamaGenerateResponse>().await {
                            Ok(body) => Ok(body.response),
                            Err(e) => Err(LlmError::InvalidResponse(format!(
                                "failed to parse response: {}",
                                e
                            ))),
                        };
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    }
                    let status = response.status();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(LlmError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("request failed: {}", e)));
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
            .unwrap_or_else(|| LlmError::Communication("max retries exceeded".to_string())))
    }

    /// Ask for a structured answer, deserialized from the model's JSON.
    pub async fn ask_structured<T>(&self, context: &str, question: &str) -> Result<T, LlmError>
    where
        T: serde::de::DeserializeOwned,
    {
        let answer = self.ask(context, question).await?;
        serde_json::from_str(&answer).map_err(|e| {
            LlmError::InvalidResponse(format!("failed to parse structured answer: {}", e))
        })
    }
}

#[async_trait]
impl AnswerChain for OllamaChain {
    async fn ask(&self, context: &str, question: &str) -> Result<String, LlmError> {
        let prompt = Self::build_prompt(context, question);
        tracing::debug!(model = %self.model, "asking answer chain");
        self.generate(&prompt).await
    }
}
