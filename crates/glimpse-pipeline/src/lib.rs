//! Glimpse Deduplicating Pipeline
//!
//! The stateful core of the system: turns a raw screen image into either
//! a stored artifact or a discarded duplicate.
//!
//! One invocation runs: capture (or caller-supplied image) → recognition
//! → embedding → similarity against the last *accepted* capture →
//! acceptance decision → file relocation → durable write → state update.
//! Side effects keep that strict order so the capture log can never
//! reference a missing image file.
//!
//! The only mutable state is the embedding of the most recent accepted
//! capture that produced one. It lives behind a mutex held across the whole
//! decide-then-update section, so concurrent callers cannot both read the
//! same stale embedding and both be accepted as novel. The state is not
//! persisted; after a restart the first non-empty capture is always
//! accepted.
//!
//! # Examples
//!
//! ```no_run
//! use glimpse_pipeline::{Pipeline, PipelineConfig};
//! use glimpse_store::SqliteStore;
//! use glimpse_vision::{CommandCapture, HashEmbedder, TesseractRecognizer};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("glimpse.db")?;
//! let pipeline = Pipeline::new(
//!     Arc::new(CommandCapture::default()),
//!     Arc::new(TesseractRecognizer::default()),
//!     Arc::new(HashEmbedder::default()),
//!     store,
//!     PipelineConfig::default(),
//! )?;
//!
//! let result = pipeline.capture_and_process(true).await?;
//! if result.was_stored() {
//!     println!("stored: {:?}", result.image_path);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod pipeline;
mod temp;

pub use config::PipelineConfig;
pub use pipeline::{Pipeline, PipelineError};
