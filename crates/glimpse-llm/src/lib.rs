//! Glimpse LLM Layer
//!
//! Answer-chain collaborators: given accumulated context and a question,
//! produce an answer. The pipeline core does not shape this contract; it
//! is consumed by the CLI's `ask` command.
//!
//! # Providers
//!
//! - [`MockChain`]: deterministic mock for testing
//! - [`OllamaChain`]: local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use glimpse_llm::{AnswerChain, MockChain};
//!
//! # async fn run() {
//! let chain = MockChain::new("Hello from the chain!");
//! let answer = chain.ask("context", "any question").await.unwrap();
//! assert_eq!(answer, "Hello from the chain!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaChain;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// An LLM chain answering a question against supplied context.
#[async_trait]
pub trait AnswerChain: Send + Sync {
    /// Answer `question` using `context` as grounding material.
    async fn ask(&self, context: &str, question: &str) -> Result<String, LlmError>;
}

/// Mock answer chain for deterministic testing.
///
/// Returns pre-configured answers keyed by question, without any network
/// calls, and counts invocations.
#[derive(Debug, Clone)]
pub struct MockChain {
    default_answer: String,
    answers: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockChain {
    /// Create a mock that answers every question the same way.
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            default_answer: answer.into(),
            answers: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Register a specific answer for a given question.
    pub fn add_answer(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.answers
            .lock()
            .unwrap()
            .insert(question.into(), answer.into());
    }

    /// Number of times `ask` was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new("Default mock answer")
    }
}

#[async_trait]
impl AnswerChain for MockChain {
    async fn ask(&self, _context: &str, question: &str) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap() += 1;

        let answers = self.answers.lock().unwrap();
        if let Some(answer) = answers.get(question) {
            return Ok(answer.clone());
        }

        Ok(self.default_answer.clone())
    }
}
