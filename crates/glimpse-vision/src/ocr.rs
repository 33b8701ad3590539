//! Text recognition via the Tesseract CLI

use async_trait::async_trait;
use glimpse_domain::{RecognitionError, Recognizer};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

/// Default recognition command.
pub const DEFAULT_OCR_COMMAND: &str = "tesseract";

/// Default recognition timeout (60 seconds).
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;

/// Recognizes image text by invoking `tesseract <image> stdout`.
///
/// A timeout is enforced around the whole invocation; for the pipeline's
/// cleanup contract a timeout is the same thing as an unavailable engine.
pub struct TesseractRecognizer {
    program: String,
    timeout: Duration,
}

impl TesseractRecognizer {
    /// Create a recognizer for the given tesseract binary.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS),
        }
    }

    /// Override the recognition timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_OCR_COMMAND)
    }
}

#[async_trait]
impl Recognizer for TesseractRecognizer {
    async fn recognize(&self, image_path: &Path) -> Result<String, RecognitionError> {
        let invocation = Command::new(&self.program)
            .arg(image_path)
            .arg("stdout")
            .output();

        let output = tokio::time::timeout(self.timeout, invocation)
            .await
            .map_err(|_| {
                RecognitionError::Unavailable(format!(
                    "{} timed out after {:?}",
                    self.program, self.timeout
                ))
            })?
            .map_err(|e| {
                RecognitionError::Unavailable(format!("failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Unavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
