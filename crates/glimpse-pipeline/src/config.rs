//! Configuration for the deduplicating pipeline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default similarity threshold: captures at or above this are duplicates.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.9;

/// Configuration for the deduplicating pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Scratch location for freshly captured images
    pub temp_dir: PathBuf,

    /// Permanent location for accepted images
    pub images_dir: PathBuf,

    /// Acceptance cutoff: a capture is stored when its similarity to the
    /// last accepted capture is strictly below this value
    pub similarity_threshold: f32,
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.temp_dir.as_os_str().is_empty() {
            return Err("temp_dir must not be empty".to_string());
        }
        if self.images_dir.as_os_str().is_empty() {
            return Err("images_dir must not be empty".to_string());
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(format!(
                "similarity_threshold must be in (0, 1], got {}",
                self.similarity_threshold
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().join("glimpse"),
            images_dir: PathBuf::from("images"),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}
