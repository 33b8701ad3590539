//! Glimpse Domain Layer
//!
//! This crate contains the core domain model for Glimpse: the value types
//! produced by the capture pipeline, the conversation log records, and the
//! trait interfaces for the external collaborators (screen capture, text
//! recognition, embedding).
//!
//! ## Key Concepts
//!
//! - **Capture**: one screen image plus its recognized text and embedding
//! - **Acceptance**: the decision to persist a capture as non-duplicate
//! - **Similarity threshold**: cutoff below which a capture counts as new
//!
//! ## Architecture
//!
//! - Value types and trait definitions only
//! - Infrastructure implementations live in other crates
//!   (glimpse-vision, glimpse-store, glimpse-pipeline)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capture;
pub mod conversation;
pub mod similarity;
pub mod traits;

// Re-exports for convenience
pub use capture::{CaptureFailure, CaptureResult, Embedding, PersistedCapture};
pub use conversation::{ConversationTurn, Role};
pub use similarity::cosine_similarity;
pub use traits::{CaptureError, CaptureSource, Embedder, EmbeddingError, RecognitionError, Recognizer};
