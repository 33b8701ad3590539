//! Integration tests for the deduplicating pipeline
//!
//! Collaborators are replaced with scripted mocks; the store is a real
//! SQLite database on disk so row counts can be verified through a
//! second connection.

use async_trait::async_trait;
use glimpse_domain::{
    CaptureError, CaptureFailure, CaptureSource, Embedder, Embedding, EmbeddingError,
    RecognitionError, Recognizer,
};
use glimpse_pipeline::{Pipeline, PipelineConfig};
use glimpse_store::SqliteStore;
use glimpse_vision::HashEmbedder;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ---------------------------------------------------------------------
// Mock collaborators
// ---------------------------------------------------------------------

/// Writes fixed bytes to the destination, standing in for a screenshot.
struct FileCapture;

#[async_trait]
impl CaptureSource for FileCapture {
    async fn take_screenshot(&self, destination: &Path) -> Result<(), CaptureError> {
        std::fs::write(destination, b"fake image bytes")?;
        Ok(())
    }
}

struct FailingCapture;

#[async_trait]
impl CaptureSource for FailingCapture {
    async fn take_screenshot(&self, _destination: &Path) -> Result<(), CaptureError> {
        Err(CaptureError::Unavailable("no display".to_string()))
    }
}

/// Returns a scripted sequence of recognition results, one per call.
struct ScriptedRecognizer {
    texts: Mutex<VecDeque<String>>,
}

impl ScriptedRecognizer {
    fn new(texts: &[&str]) -> Self {
        Self {
            texts: Mutex::new(texts.iter().map(|t| t.to_string()).collect()),
        }
    }
}

#[async_trait]
impl Recognizer for ScriptedRecognizer {
    async fn recognize(&self, _image_path: &Path) -> Result<String, RecognitionError> {
        Ok(self
            .texts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

struct FailingRecognizer;

#[async_trait]
impl Recognizer for FailingRecognizer {
    async fn recognize(&self, _image_path: &Path) -> Result<String, RecognitionError> {
        Err(RecognitionError::Unavailable("engine missing".to_string()))
    }
}

/// Fails the first `failures` calls, then produces a constant vector.
struct FlakyEmbedder {
    failures_left: Mutex<u32>,
}

impl FlakyEmbedder {
    fn new(failures: u32) -> Self {
        Self {
            failures_left: Mutex::new(failures),
        }
    }
}

#[async_trait]
impl Embedder for FlakyEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
        let mut left = self.failures_left.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err(EmbeddingError::Unavailable("model missing".to_string()));
        }
        Ok(vec![1.0, 0.0])
    }
}

/// Always returns the same unit vector, so consecutive captures compare
/// at exactly 1.0.
struct ConstEmbedder;

#[async_trait]
impl Embedder for ConstEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(vec![1.0, 0.0])
    }
}

// ---------------------------------------------------------------------
// Test bed
// ---------------------------------------------------------------------

struct TestBed {
    _dir: TempDir,
    temp_dir: PathBuf,
    images_dir: PathBuf,
    db_path: PathBuf,
}

impl TestBed {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        Self {
            temp_dir: dir.path().join("temp"),
            images_dir: dir.path().join("images"),
            db_path: dir.path().join("glimpse.db"),
            _dir: dir,
        }
    }

    fn config(&self, threshold: f32) -> PipelineConfig {
        PipelineConfig {
            temp_dir: self.temp_dir.clone(),
            images_dir: self.images_dir.clone(),
            similarity_threshold: threshold,
        }
    }

    fn pipeline(
        &self,
        capture: Arc<dyn CaptureSource>,
        recognizer: Arc<dyn Recognizer>,
        embedder: Arc<dyn Embedder>,
        threshold: f32,
    ) -> Pipeline {
        let store = SqliteStore::new(&self.db_path).unwrap();
        Pipeline::new(capture, recognizer, embedder, store, self.config(threshold)).unwrap()
    }

    fn stored_rows(&self) -> usize {
        SqliteStore::new(&self.db_path)
            .unwrap()
            .recent_captures(100)
            .unwrap()
            .len()
    }

    fn temp_files(&self) -> usize {
        std::fs::read_dir(&self.temp_dir).unwrap().count()
    }
}

// ---------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------

#[tokio::test]
async fn test_first_capture_is_accepted() {
    let bed = TestBed::new();
    let pipeline = bed.pipeline(
        Arc::new(FileCapture),
        Arc::new(ScriptedRecognizer::new(&["hello world"])),
        Arc::new(HashEmbedder::default()),
        0.9,
    );

    let result = pipeline.capture_and_process(true).await.unwrap();

    assert!(result.was_stored());
    assert_eq!(result.text, "hello world");
    assert_eq!(result.similarity, 0.0);
    assert!(result.error.is_none());
    assert!(result.image_path.as_ref().unwrap().exists());
    assert!(result.image_path.as_ref().unwrap().starts_with(&bed.images_dir));
    assert_eq!(bed.stored_rows(), 1);
    assert_eq!(bed.temp_files(), 0, "accepted temp must be moved, not copied");
}

#[tokio::test]
async fn test_identical_second_capture_is_rejected() {
    let bed = TestBed::new();
    let pipeline = bed.pipeline(
        Arc::new(FileCapture),
        Arc::new(ScriptedRecognizer::new(&["same text", "same text"])),
        Arc::new(HashEmbedder::default()),
        0.9,
    );

    let first = pipeline.capture_and_process(true).await.unwrap();
    let second = pipeline.capture_and_process(true).await.unwrap();

    assert!(first.was_stored());
    assert!(!second.was_stored());
    assert!(second.similarity > 0.99, "self-match should be near total");
    assert_eq!(bed.stored_rows(), 1);
    assert_eq!(bed.temp_files(), 0, "rejected temp must be deleted");
}

#[tokio::test]
async fn test_different_content_is_accepted_again() {
    // Threshold 0.9 scenario: accept A, reject identical B, accept
    // different C, with the state following accepted captures only.
    let bed = TestBed::new();
    let pipeline = bed.pipeline(
        Arc::new(FileCapture),
        Arc::new(ScriptedRecognizer::new(&[
            "hello world",
            "hello world",
            "an entirely different desktop full of other things",
        ])),
        Arc::new(HashEmbedder::default()),
        0.9,
    );

    let a = pipeline.capture_and_process(true).await.unwrap();
    let b = pipeline.capture_and_process(true).await.unwrap();
    let c = pipeline.capture_and_process(true).await.unwrap();

    assert!(a.was_stored());
    assert!(!b.was_stored());
    assert!(c.was_stored());
    assert!(c.similarity < 0.9);
    assert_eq!(bed.stored_rows(), 2);
}

#[tokio::test]
async fn test_similarity_equal_to_threshold_rejects() {
    // ConstEmbedder makes the second comparison exactly 1.0; with the
    // threshold also 1.0 the strict-less-than law must reject.
    let bed = TestBed::new();
    let pipeline = bed.pipeline(
        Arc::new(FileCapture),
        Arc::new(ScriptedRecognizer::new(&["first", "second"])),
        Arc::new(ConstEmbedder),
        1.0,
    );

    let first = pipeline.capture_and_process(true).await.unwrap();
    let second = pipeline.capture_and_process(true).await.unwrap();

    assert!(first.was_stored());
    assert_eq!(second.similarity, 1.0);
    assert!(!second.was_stored(), "equality must reject");
    assert_eq!(bed.stored_rows(), 1);
}

#[tokio::test]
async fn test_empty_text_is_never_stored() {
    let bed = TestBed::new();
    let pipeline = bed.pipeline(
        Arc::new(FileCapture),
        Arc::new(ScriptedRecognizer::new(&["", "   \n\t  "])),
        Arc::new(HashEmbedder::default()),
        0.9,
    );

    for _ in 0..2 {
        let result = pipeline.capture_and_process(true).await.unwrap();
        assert!(!result.was_stored());
        assert_eq!(result.similarity, 0.0);
        assert!(result.error.is_none());
    }

    assert_eq!(bed.stored_rows(), 0);
    assert_eq!(bed.temp_files(), 0, "empty-text temp must be deleted");
}

#[tokio::test]
async fn test_recognition_failure_leaves_no_temp_file() {
    let bed = TestBed::new();
    let pipeline = bed.pipeline(
        Arc::new(FileCapture),
        Arc::new(FailingRecognizer),
        Arc::new(HashEmbedder::default()),
        0.9,
    );

    let result = pipeline.capture_and_process(true).await.unwrap();

    assert!(!result.was_stored());
    assert!(result.text.is_empty());
    assert!(matches!(
        result.error,
        Some(CaptureFailure::RecognitionUnavailable(_))
    ));
    assert_eq!(bed.stored_rows(), 0);
    assert_eq!(bed.temp_files(), 0, "recognition failure must not leak temp files");
}

#[tokio::test]
async fn test_capture_failure_is_absorbed() {
    let bed = TestBed::new();
    let pipeline = bed.pipeline(
        Arc::new(FailingCapture),
        Arc::new(ScriptedRecognizer::new(&["unreached"])),
        Arc::new(HashEmbedder::default()),
        0.9,
    );

    let result = pipeline.capture_and_process(true).await.unwrap();

    assert!(!result.was_stored());
    assert!(matches!(
        result.error,
        Some(CaptureFailure::CaptureUnavailable(_))
    ));
    assert_eq!(bed.temp_files(), 0);
}

#[tokio::test]
async fn test_embedding_failure_persists_without_state_update() {
    let bed = TestBed::new();
    let pipeline = bed.pipeline(
        Arc::new(FileCapture),
        Arc::new(ScriptedRecognizer::new(&[
            "some text",
            "some text",
            "some text",
        ])),
        Arc::new(FlakyEmbedder::new(1)),
        0.9,
    );

    // Embedding fails: similarity degrades to 0, which is below any valid
    // threshold, so the capture is still stored.
    let degraded = pipeline.capture_and_process(true).await.unwrap();
    assert_eq!(degraded.text, "some text");
    assert_eq!(degraded.similarity, 0.0);
    assert!(matches!(
        degraded.error,
        Some(CaptureFailure::EmbeddingUnavailable(_))
    ));
    assert!(degraded.was_stored());
    assert_eq!(bed.stored_rows(), 1);
    assert_eq!(bed.temp_files(), 0);

    // The degraded invocation left the state untouched, so the next
    // capture still sees no prior embedding and is accepted outright.
    let next = pipeline.capture_and_process(true).await.unwrap();
    assert!(next.was_stored());
    assert_eq!(next.similarity, 0.0);
    assert!(next.error.is_none());
    assert_eq!(bed.stored_rows(), 2);

    // That one did update the state: the identical third capture compares
    // at 1.0 and is rejected.
    let third = pipeline.capture_and_process(true).await.unwrap();
    assert!(!third.was_stored());
    assert_eq!(third.similarity, 1.0);
    assert_eq!(bed.stored_rows(), 2);
}

#[tokio::test]
async fn test_embedding_failure_dry_run_stores_nothing() {
    let bed = TestBed::new();
    let pipeline = bed.pipeline(
        Arc::new(FileCapture),
        Arc::new(ScriptedRecognizer::new(&["some text"])),
        Arc::new(FlakyEmbedder::new(u32::MAX)),
        0.9,
    );

    let result = pipeline.capture_and_process(false).await.unwrap();

    assert!(!result.was_stored());
    assert!(matches!(
        result.error,
        Some(CaptureFailure::EmbeddingUnavailable(_))
    ));
    assert_eq!(bed.stored_rows(), 0);
    assert_eq!(bed.temp_files(), 0);
}

#[tokio::test]
async fn test_concurrent_identical_captures_store_exactly_one() {
    let bed = TestBed::new();
    let pipeline = Arc::new(bed.pipeline(
        Arc::new(FileCapture),
        Arc::new(ScriptedRecognizer::new(&["same text", "same text"])),
        Arc::new(HashEmbedder::default()),
        0.9,
    ));

    // Both invocations start before either finishes; the internal lock
    // must keep one from reading the other's stale state.
    let first = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.capture_and_process(true).await }
    });
    let second = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.capture_and_process(true).await }
    });

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    assert!(
        first.was_stored() != second.was_stored(),
        "exactly one of two identical concurrent captures may be stored"
    );
    assert_eq!(bed.stored_rows(), 1);
    assert_eq!(bed.temp_files(), 0);
}

#[tokio::test]
async fn test_persist_false_skips_storage_and_state() {
    let bed = TestBed::new();
    let pipeline = bed.pipeline(
        Arc::new(FileCapture),
        Arc::new(ScriptedRecognizer::new(&["observed", "observed"])),
        Arc::new(HashEmbedder::default()),
        0.9,
    );

    let dry = pipeline.capture_and_process(false).await.unwrap();
    assert!(!dry.was_stored());
    assert_eq!(bed.stored_rows(), 0);
    assert_eq!(bed.temp_files(), 0);

    // State was not updated by the dry run, so the identical text is
    // still treated as the first capture and accepted.
    let wet = pipeline.capture_and_process(true).await.unwrap();
    assert!(wet.was_stored());
    assert_eq!(wet.similarity, 0.0);
}

#[tokio::test]
async fn test_process_existing_copies_instead_of_moving() {
    let bed = TestBed::new();
    let source_dir = tempfile::tempdir().unwrap();
    let source = source_dir.path().join("existing.png");
    std::fs::write(&source, b"caller-owned image").unwrap();

    let pipeline = bed.pipeline(
        Arc::new(FailingCapture),
        Arc::new(ScriptedRecognizer::new(&["from an existing image"])),
        Arc::new(HashEmbedder::default()),
        0.9,
    );

    let result = pipeline.process_existing(&source, true).await.unwrap();

    assert!(result.was_stored());
    assert!(source.exists(), "source image must be copied, never moved");
    let stored = result.image_path.unwrap();
    assert!(stored.exists());
    assert_ne!(stored, source);
    assert_eq!(bed.stored_rows(), 1);
}

#[tokio::test]
async fn test_process_existing_duplicate_leaves_source_alone() {
    let bed = TestBed::new();
    let source_dir = tempfile::tempdir().unwrap();
    let source = source_dir.path().join("existing.png");
    std::fs::write(&source, b"caller-owned image").unwrap();

    let pipeline = bed.pipeline(
        Arc::new(FailingCapture),
        Arc::new(ScriptedRecognizer::new(&["same content", "same content"])),
        Arc::new(HashEmbedder::default()),
        0.9,
    );

    let first = pipeline.process_existing(&source, true).await.unwrap();
    let second = pipeline.process_existing(&source, true).await.unwrap();

    assert!(first.was_stored());
    assert!(!second.was_stored());
    assert!(source.exists());
    assert_eq!(bed.stored_rows(), 1);
}

#[tokio::test]
async fn test_same_second_captures_get_distinct_names() {
    let bed = TestBed::new();
    let pipeline = bed.pipeline(
        Arc::new(FileCapture),
        Arc::new(ScriptedRecognizer::new(&[
            "first capture text",
            "completely unrelated second capture",
        ])),
        Arc::new(HashEmbedder::default()),
        0.9,
    );

    // Both captures land within the same wall-clock second; the sequence
    // suffix must keep the permanent filenames apart.
    let a = pipeline.capture_and_process(true).await.unwrap();
    let b = pipeline.capture_and_process(true).await.unwrap();

    assert!(a.was_stored());
    assert!(b.was_stored());
    assert_ne!(a.image_path, b.image_path);
    assert_eq!(bed.stored_rows(), 2);
}
