//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Durable store error
    #[error("Store error: {0}")]
    Store(#[from] glimpse_store::StoreError),

    /// Pipeline error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] glimpse_pipeline::PipelineError),

    /// Document extraction error
    #[error("Extraction error: {0}")]
    Extract(#[from] glimpse_extract::ExtractError),

    /// LLM error
    #[error("LLM error: {0}")]
    Llm(#[from] glimpse_llm::LlmError),

    /// GitHub API error
    #[error("GitHub error: {0}")]
    Github(#[from] glimpse_github::GithubError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
