//! Screenshot capture via an external command

use async_trait::async_trait;
use glimpse_domain::{CaptureError, CaptureSource};
use std::path::Path;
use tokio::process::Command;

/// Default screenshot command (X11's `scrot`).
pub const DEFAULT_CAPTURE_COMMAND: &str = "scrot";

/// Captures the screen by spawning an external screenshot tool.
///
/// The destination path is appended as the command's final argument, which
/// matches the invocation shape of the common tools (`scrot <path>`,
/// `grim <path>`, `screencapture <path>`).
pub struct CommandCapture {
    program: String,
    args: Vec<String>,
}

impl CommandCapture {
    /// Create a capture source for the given program and fixed arguments.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Default for CommandCapture {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_COMMAND, Vec::new())
    }
}

#[async_trait]
impl CaptureSource for CommandCapture {
    async fn take_screenshot(&self, destination: &Path) -> Result<(), CaptureError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(destination)
            .output()
            .await
            .map_err(|e| {
                CaptureError::Unavailable(format!("failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::Unavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        // Some tools exit zero without writing anything
        if !destination.exists() {
            return Err(CaptureError::Unavailable(format!(
                "{} reported success but wrote no image",
                self.program
            )));
        }

        tracing::debug!(path = %destination.display(), "screenshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_capture_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("shot.png");

        // `touch <path>` stands in for a real screenshot tool
        let capture = CommandCapture::new("touch", Vec::new());
        capture.take_screenshot(&destination).await.unwrap();
        assert!(destination.exists());
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let capture = CommandCapture::new("glimpse-no-such-screenshot-tool", Vec::new());

        let result = capture.take_screenshot(&dir.path().join("shot.png")).await;
        assert!(matches!(result, Err(CaptureError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_failing_program_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let capture = CommandCapture::new("false", Vec::new());

        let result = capture.take_screenshot(&dir.path().join("shot.png")).await;
        assert!(matches!(result, Err(CaptureError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_success_without_output_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let capture = CommandCapture::new("true", Vec::new());

        let result = capture.take_screenshot(&dir.path().join("shot.png")).await;
        assert!(matches!(result, Err(CaptureError::Unavailable(_))));
    }
}
