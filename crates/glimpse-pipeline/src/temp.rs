//! Scoped cleanup for pipeline-acquired temporary images

use std::io;
use std::path::{Path, PathBuf};

/// Owns a temporary image file for the duration of one pipeline
/// invocation.
///
/// Dropping the guard removes the file, so every early return (capture
/// failure, recognition failure, empty text, rejection) cleans up
/// structurally rather than by remembering to call remove on each path.
/// [`promote`](TempArtifact::promote) renames the file into its permanent
/// location and disarms the guard; if the rename fails the guard stays
/// armed and the temp file is still removed.
pub struct TempArtifact {
    path: PathBuf,
    armed: bool,
}

impl TempArtifact {
    /// Take ownership of the (possibly not-yet-written) file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    /// The temporary file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the file to `destination` and disarm the guard.
    pub fn promote(mut self, destination: &Path) -> io::Result<()> {
        std::fs::rename(&self.path, destination)?;
        self.armed = false;
        Ok(())
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if self.armed {
            // The file may legitimately not exist (capture never wrote it)
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp.png");
        std::fs::write(&path, b"image").unwrap();

        drop(TempArtifact::new(path.clone()));
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        drop(TempArtifact::new(dir.path().join("never-written.png")));
    }

    #[test]
    fn test_promote_moves_and_disarms() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("temp.png");
        let destination = dir.path().join("image.png");
        std::fs::write(&source, b"image").unwrap();

        TempArtifact::new(source.clone()).promote(&destination).unwrap();
        assert!(!source.exists());
        assert!(destination.exists());
    }

    #[test]
    fn test_failed_promote_still_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("temp.png");
        std::fs::write(&source, b"image").unwrap();

        let guard = TempArtifact::new(source.clone());
        let result = guard.promote(&dir.path().join("missing-dir").join("image.png"));
        assert!(result.is_err());
        assert!(!source.exists());
    }
}
