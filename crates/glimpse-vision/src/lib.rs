//! Glimpse Vision Layer
//!
//! Implementations of the pipeline's collaborator traits from
//! `glimpse-domain`:
//!
//! - [`CommandCapture`]: screenshot via a configurable external command
//! - [`TesseractRecognizer`]: image-to-text via the Tesseract CLI
//! - [`OllamaEmbedder`]: text-to-vector via a local Ollama instance
//! - [`HashEmbedder`]: deterministic offline embeddings for testing and
//!   network-free operation
//!
//! The pipeline never depends on any of these concretely; it drives the
//! trait objects, so a failed or absent collaborator surfaces as a typed
//! error instead of a crash.

#![warn(missing_docs)]

pub mod capture;
pub mod embed;
pub mod ocr;

pub use capture::CommandCapture;
pub use embed::{HashEmbedder, OllamaEmbedder};
pub use ocr::TesseractRecognizer;
