//! Extractors for plain-text, tabular, and lightweight-markup formats

use crate::error::ExtractError;
use pulldown_cmark::{Event, Parser, TagEnd};
use std::path::Path;

/// Plain text: the file contents as-is.
pub fn extract_txt(path: &Path) -> Result<String, ExtractError> {
    Ok(std::fs::read_to_string(path)?)
}

/// CSV: one line per row, fields joined with `" | "` to keep the column
/// structure readable. The header row is rendered like any other row so
/// the column names stay visible in the extracted text.
pub fn extract_csv(path: &Path) -> Result<String, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ExtractError::Parse(e.to_string()))?;

    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ExtractError::Parse(e.to_string()))?;
        lines.push(record.iter().collect::<Vec<_>>().join(" | "));
    }

    Ok(lines.join("\n").trim().to_string())
}

/// Markdown: the document's text content with formatting stripped.
pub fn extract_markdown(path: &Path) -> Result<String, ExtractError> {
    let source = std::fs::read_to_string(path)?;
    let mut text = String::new();

    for event in Parser::new(&source) {
        match event {
            Event::Text(t) => text.push_str(&t),
            Event::Code(c) => text.push_str(&c),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item)
            | Event::End(TagEnd::CodeBlock) => text.push('\n'),
            _ => {}
        }
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_txt_passthrough() {
        let file = write_temp(".txt", "hello\nworld\n");
        let text = extract_txt(file.path()).unwrap();
        assert_eq!(text, "hello\nworld\n");
    }

    #[test]
    fn test_csv_rows_as_lines() {
        let file = write_temp(".csv", "name,age\nalice,30\nbob,41\n");
        let text = extract_csv(file.path()).unwrap();
        assert_eq!(text, "name | age\nalice | 30\nbob | 41");
    }

    #[test]
    fn test_csv_unreadable_file_fails() {
        let result = extract_csv(Path::new("no-such-file.csv"));
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[test]
    fn test_csv_ragged_rows() {
        let file = write_temp(".csv", "a,b,c\nd,e\n");
        let text = extract_csv(file.path()).unwrap();
        assert_eq!(text, "a | b | c\nd | e");
    }

    #[test]
    fn test_markdown_strips_formatting() {
        let file = write_temp(".md", "# Title\n\nSome *emphasized* text with `code`.\n");
        let text = extract_markdown(file.path()).unwrap();
        assert!(text.contains("Title"));
        assert!(text.contains("Some emphasized text with code."));
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
    }
}
