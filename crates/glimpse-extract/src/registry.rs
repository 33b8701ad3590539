//! Extension-keyed dispatch to the per-format extractors

use crate::error::ExtractError;
use crate::{document, markup, plain};
use std::path::Path;

/// The closed set of supported document formats.
///
/// Resolution is a static mapping from the lower-cased file extension;
/// there is no runtime registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.txt`
    PlainText,
    /// `.csv`
    Csv,
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.md`
    Markdown,
    /// `.docx`
    Docx,
    /// `.pdf`
    Pdf,
}

impl Format {
    /// Resolve the format for a file path from its extension.
    ///
    /// # Errors
    ///
    /// [`ExtractError::UnsupportedFormat`] when the extension is missing
    /// or outside the supported set.
    ///
    /// # Examples
    ///
    /// ```
    /// use glimpse_extract::Format;
    ///
    /// assert_eq!(Format::from_path("a/b.JSON".as_ref()).unwrap(), Format::Json);
    /// assert!(Format::from_path("archive.tar.gz".as_ref()).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ExtractError::UnsupportedFormat("<none>".to_string()))?;

        match extension.as_str() {
            "txt" => Ok(Format::PlainText),
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            "md" => Ok(Format::Markdown),
            "docx" => Ok(Format::Docx),
            "pdf" => Ok(Format::Pdf),
            _ => Err(ExtractError::UnsupportedFormat(extension)),
        }
    }

    /// Run the extractor for this format against `path`.
    pub fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        match self {
            Format::PlainText => plain::extract_txt(path),
            Format::Csv => plain::extract_csv(path),
            Format::Markdown => plain::extract_markdown(path),
            Format::Json => markup::extract_json(path),
            Format::Yaml => markup::extract_yaml(path),
            Format::Toml => markup::extract_toml(path),
            Format::Docx => document::extract_docx(path),
            Format::Pdf => document::extract_pdf(path),
        }
    }
}

/// Resolve the format for `path` and extract its normalized text.
///
/// This is the single entry point for document ingestion: dispatch then
/// delegate. Format resolution errors and extraction errors both
/// propagate as hard failures; no text is better than wrong text.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let format = Format::from_path(path)?;
    tracing::debug!(?format, path = %path.display(), "extracting document text");
    format.extract_text(path)
}
