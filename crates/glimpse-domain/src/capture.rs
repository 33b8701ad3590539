//! Capture module - value types produced by the deduplicating pipeline

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Fixed-form vector representation of text, used only for similarity
/// comparison between consecutive captures.
pub type Embedding = Vec<f32>;

/// Failure tag carried by a [`CaptureResult`] when a collaborator was
/// unavailable or raised.
///
/// These are recoverable outcomes: a caller loop (e.g. periodic polling)
/// inspects the tag and continues rather than crashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureFailure {
    /// The screenshot primitive failed or is absent
    CaptureUnavailable(String),

    /// Text recognition failed, timed out, or is absent
    RecognitionUnavailable(String),

    /// Embedding failed; the pipeline degraded to similarity 0
    EmbeddingUnavailable(String),
}

impl std::fmt::Display for CaptureFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureFailure::CaptureUnavailable(msg) => write!(f, "capture unavailable: {}", msg),
            CaptureFailure::RecognitionUnavailable(msg) => {
                write!(f, "recognition unavailable: {}", msg)
            }
            CaptureFailure::EmbeddingUnavailable(msg) => {
                write!(f, "embedding unavailable: {}", msg)
            }
        }
    }
}

/// Ephemeral value produced by one pipeline invocation.
///
/// Invariant: `image_path` is `Some` if and only if this invocation's
/// capture was persisted.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Capture instant
    pub timestamp: DateTime<Utc>,

    /// Permanent image location, present only when the capture was stored
    pub image_path: Option<PathBuf>,

    /// Recognized text (possibly empty)
    pub text: String,

    /// Similarity to the last accepted capture, in [0, 1].
    /// 0 when no prior capture exists.
    pub similarity: f32,

    /// Failure tag when a collaborator was unavailable
    pub error: Option<CaptureFailure>,
}

impl CaptureResult {
    /// A result for the given instant with no text, no image, and
    /// similarity 0. The starting point of every pipeline invocation.
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            image_path: None,
            text: String::new(),
            similarity: 0.0,
            error: None,
        }
    }

    /// Whether this invocation persisted its capture.
    pub fn was_stored(&self) -> bool {
        self.image_path.is_some()
    }
}

/// Durable record in the capture log.
///
/// Created exactly once per accepted capture; never mutated or deleted by
/// this subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedCapture {
    /// Auto-assigned row identity
    pub id: i64,

    /// Capture instant
    pub timestamp: DateTime<Utc>,

    /// Permanent image file the store now logically owns
    pub image_path: PathBuf,

    /// Text recognized from the image at capture time
    pub extracted_text: String,
}
