//! Trait definitions for the pipeline's external collaborators
//!
//! These traits define the boundaries between the orchestration core and
//! the collaborators it drives (screen capture, text recognition, text
//! embedding). Implementations live in glimpse-vision; the pipeline only
//! ever sees these interfaces, which keeps every collaborator failure a
//! first-class, testable outcome.

use crate::capture::Embedding;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from the screenshot primitive.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The capture tool failed, is absent, or timed out
    #[error("Capture unavailable: {0}")]
    Unavailable(String),

    /// I/O error while writing the destination image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the image-to-text recognition collaborator.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// The recognition engine failed, is absent, or timed out.
    /// Timeouts are deliberately folded in here: for temp-file cleanup
    /// purposes they are indistinguishable from unavailability.
    #[error("Recognition unavailable: {0}")]
    Unavailable(String),

    /// I/O error while reading the source image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the text-to-vector embedding collaborator.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// The embedding model failed, is absent, or timed out
    #[error("Embedding unavailable: {0}")]
    Unavailable(String),

    /// Input text the model cannot embed
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Produces a raw screen image at a caller-chosen path.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Write a screenshot to `destination`, or fail.
    async fn take_screenshot(&self, destination: &Path) -> Result<(), CaptureError>;
}

/// Converts an image into text.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Recognize the text content of the image at `image_path`.
    async fn recognize(&self, image_path: &Path) -> Result<String, RecognitionError>;
}

/// Converts text into a fixed-form vector representation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed `text` into a vector suitable for cosine comparison.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;
}
