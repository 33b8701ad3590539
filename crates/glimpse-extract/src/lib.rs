//! Glimpse Extraction Layer
//!
//! Routes a document file to the correct text extractor based on its file
//! extension and produces normalized text. Dispatch is the contract this
//! crate guarantees; parsing fidelity belongs to the format libraries it
//! delegates to.
//!
//! Supported formats: `.txt`, `.csv`, `.json`, `.yaml`/`.yml`, `.toml`,
//! `.md`, `.docx`, `.pdf`. Anything else fails with
//! [`ExtractError::UnsupportedFormat`], which propagates to the caller
//! unchanged (no silent fallback).
//!
//! # Examples
//!
//! ```no_run
//! use glimpse_extract::extract_text;
//!
//! let text = extract_text("notes/meeting.md".as_ref()).unwrap();
//! println!("{}", text);
//! ```

#![warn(missing_docs)]

mod document;
mod error;
mod markup;
mod plain;
mod registry;

pub use error::ExtractError;
pub use registry::{extract_text, Format};
