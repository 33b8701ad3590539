//! Extractors for structured-markup formats (JSON, YAML, TOML)
//!
//! Each one parses the document into the format's value model and
//! re-serializes it, so malformed input fails loudly and well-formed
//! input comes out normalized.

use crate::error::ExtractError;
use std::path::Path;

/// JSON: parsed and pretty-printed.
pub fn extract_json(path: &Path) -> Result<String, ExtractError> {
    let raw = std::fs::read_to_string(path)?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| ExtractError::Parse(e.to_string()))?;
    serde_json::to_string_pretty(&value).map_err(|e| ExtractError::Parse(e.to_string()))
}

/// YAML: parsed and re-serialized in canonical form.
pub fn extract_yaml(path: &Path) -> Result<String, ExtractError> {
    let raw = std::fs::read_to_string(path)?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(&raw).map_err(|e| ExtractError::Parse(e.to_string()))?;
    serde_yaml::to_string(&value).map_err(|e| ExtractError::Parse(e.to_string()))
}

/// TOML: parsed and pretty re-serialized.
pub fn extract_toml(path: &Path) -> Result<String, ExtractError> {
    let raw = std::fs::read_to_string(path)?;
    let value: toml::Value =
        toml::from_str(&raw).map_err(|e| ExtractError::Parse(e.to_string()))?;
    toml::to_string_pretty(&value).map_err(|e| ExtractError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_json_normalizes() {
        let file = write_temp(".json", r#"{"b":1,   "a":[true,null]}"#);
        let text = extract_json(file.path()).unwrap();
        assert!(text.contains("\"a\""));
        assert!(text.contains("true"));
    }

    #[test]
    fn test_json_malformed_fails() {
        let file = write_temp(".json", "{not json");
        assert!(matches!(
            extract_json(file.path()),
            Err(ExtractError::Parse(_))
        ));
    }

    #[test]
    fn test_yaml_round_trips() {
        let file = write_temp(".yaml", "name: glimpse\nitems:\n  - one\n  - two\n");
        let text = extract_yaml(file.path()).unwrap();
        assert!(text.contains("name: glimpse"));
        assert!(text.contains("- one"));
    }

    #[test]
    fn test_toml_round_trips() {
        let file = write_temp(".toml", "[server]\nport = 8080\n");
        let text = extract_toml(file.path()).unwrap();
        assert!(text.contains("[server]"));
        assert!(text.contains("port = 8080"));
    }

    #[test]
    fn test_toml_malformed_fails() {
        let file = write_temp(".toml", "= broken =");
        assert!(matches!(
            extract_toml(file.path()),
            Err(ExtractError::Parse(_))
        ));
    }
}
