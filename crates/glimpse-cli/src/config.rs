//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use glimpse_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Glimpse configuration, loaded from `~/.glimpse/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlimpseConfig {
    /// Durable store location
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Pipeline directories and similarity threshold
    #[serde(default = "default_pipeline")]
    pub pipeline: PipelineConfig,

    /// Screenshot tool settings
    #[serde(default)]
    pub capture: CaptureSettings,

    /// OCR engine settings
    #[serde(default)]
    pub ocr: OcrSettings,

    /// Embedding collaborator settings
    #[serde(default)]
    pub embedder: EmbedderSettings,

    /// Answer-chain settings
    #[serde(default)]
    pub llm: LlmSettings,
}

/// Screenshot tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Program to invoke; the destination path is appended as final arg
    pub command: String,

    /// Fixed arguments passed before the destination path
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            command: glimpse_vision::capture::DEFAULT_CAPTURE_COMMAND.to_string(),
            args: Vec::new(),
        }
    }
}

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Tesseract binary to invoke
    pub command: String,

    /// Recognition timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            command: glimpse_vision::ocr::DEFAULT_OCR_COMMAND.to_string(),
            timeout_secs: glimpse_vision::ocr::DEFAULT_OCR_TIMEOUT_SECS,
        }
    }
}

/// Which embedding collaborator to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Deterministic hash embeddings; no network required
    Hash,
    /// Ollama embeddings API
    Ollama,
}

/// Embedding collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderSettings {
    /// Which embedder to use
    pub kind: EmbedderKind,

    /// Ollama endpoint (used when kind = "ollama")
    pub endpoint: String,

    /// Ollama embedding model (used when kind = "ollama")
    pub model: String,

    /// Vector dimension (used when kind = "hash")
    pub dimension: usize,
}

impl Default for EmbedderSettings {
    fn default() -> Self {
        Self {
            kind: EmbedderKind::Hash,
            endpoint: glimpse_vision::embed::DEFAULT_ENDPOINT.to_string(),
            model: glimpse_vision::embed::DEFAULT_EMBED_MODEL.to_string(),
            dimension: 384,
        }
    }
}

/// Answer-chain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Ollama endpoint
    pub endpoint: String,

    /// Generation model
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: glimpse_llm::ollama::DEFAULT_ENDPOINT.to_string(),
            model: "llama2".to_string(),
        }
    }
}

fn glimpse_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".glimpse")
}

fn default_db_path() -> PathBuf {
    glimpse_home().join("glimpse.db")
}

fn default_pipeline() -> PipelineConfig {
    PipelineConfig {
        temp_dir: glimpse_home().join("temp"),
        images_dir: glimpse_home().join("images"),
        ..PipelineConfig::default()
    }
}

impl Default for GlimpseConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            pipeline: default_pipeline(),
            capture: CaptureSettings::default(),
            ocr: OcrSettings::default(),
            embedder: EmbedderSettings::default(),
            llm: LlmSettings::default(),
        }
    }
}

impl GlimpseConfig {
    /// Default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".glimpse").join("config.toml"))
    }

    /// Load configuration from `path`, or the defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(CliError::Config("db_path must not be empty".into()));
        }
        self.pipeline.validate().map_err(CliError::Config)?;
        if self.ocr.timeout_secs == 0 {
            return Err(CliError::Config("ocr.timeout_secs must be greater than 0".into()));
        }
        if self.embedder.kind == EmbedderKind::Hash && self.embedder.dimension == 0 {
            return Err(CliError::Config(
                "embedder.dimension must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
