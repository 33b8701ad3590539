//! Error types for the extraction layer

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// File extension outside the supported set. Carries the offending
    /// extension (lower-cased, without the dot), or `<none>` when the
    /// path has no extension at all.
    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    /// I/O error while reading the source file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The format library rejected the file contents
    #[error("Parse error: {0}")]
    Parse(String),
}
