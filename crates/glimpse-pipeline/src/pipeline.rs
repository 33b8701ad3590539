//! The capture–dedup–persist orchestrator

use crate::config::PipelineConfig;
use crate::temp::TempArtifact;
use chrono::Utc;
use glimpse_domain::{
    cosine_similarity, CaptureFailure, CaptureResult, CaptureSource, Embedder, Embedding,
    Recognizer,
};
use glimpse_store::{SqliteStore, StoreError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that abort a pipeline invocation.
///
/// Collaborator failures (capture, recognition, embedding) are *not*
/// errors at this level; they come back inside the [`CaptureResult`] so a
/// polling loop can keep going. These variants cover the hard failures
/// after the acceptance decision: relocating the image or appending the
/// durable record.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Filesystem failure while relocating an accepted image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Process-scoped mutable state: the embedding of the most recent
/// accepted capture that produced one. Not persisted; resets on restart.
struct PipelineState {
    last_embedding: Option<Embedding>,
}

/// How the image under processing was obtained.
///
/// A pipeline-acquired temporary is renamed into the permanent store on
/// acceptance and removed on every other exit path. A caller-supplied
/// image is copied on acceptance and never touched otherwise.
enum Acquired {
    Temporary(TempArtifact),
    Existing(PathBuf),
}

impl Acquired {
    fn image_path(&self) -> &Path {
        match self {
            Acquired::Temporary(temp) => temp.path(),
            Acquired::Existing(path) => path,
        }
    }
}

/// The deduplicating pipeline.
///
/// Holds the collaborators as trait objects, the durable store, and the
/// single piece of cross-call state. Invocations are serialized by an
/// internal mutex held from before recognition until after the state
/// update, so the read-then-write over `last_embedding` cannot race.
pub struct Pipeline {
    capture: Arc<dyn CaptureSource>,
    recognizer: Arc<dyn Recognizer>,
    embedder: Arc<dyn Embedder>,
    store: StdMutex<SqliteStore>,
    config: PipelineConfig,
    state: Mutex<PipelineState>,
    // Disambiguates filenames for captures within the same second
    sequence: AtomicU64,
}

impl Pipeline {
    /// Build a pipeline, validating the configuration and creating the
    /// temp and image directories.
    pub fn new(
        capture: Arc<dyn CaptureSource>,
        recognizer: Arc<dyn Recognizer>,
        embedder: Arc<dyn Embedder>,
        store: SqliteStore,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        std::fs::create_dir_all(&config.temp_dir)?;
        std::fs::create_dir_all(&config.images_dir)?;

        Ok(Self {
            capture,
            recognizer,
            embedder,
            store: StdMutex::new(store),
            config,
            state: Mutex::new(PipelineState {
                last_embedding: None,
            }),
            sequence: AtomicU64::new(0),
        })
    }

    /// Acquire a fresh screenshot into a temporary location and run the
    /// shared pipeline. On acceptance the temp file is renamed into the
    /// permanent image directory.
    ///
    /// Capture and recognition failures come back inside the result's
    /// `error` field; `Err` is reserved for persistence failures.
    pub async fn capture_and_process(
        &self,
        persist: bool,
    ) -> Result<CaptureResult, PipelineError> {
        let mut state = self.state.lock().await;

        let timestamp = Utc::now();
        let stamp = self.stamp(&timestamp);
        let temp = TempArtifact::new(self.config.temp_dir.join(format!("temp_{}.png", stamp)));
        let mut result = CaptureResult::empty(timestamp);

        if let Err(e) = self.capture.take_screenshot(temp.path()).await {
            tracing::warn!(error = %e, "screen capture failed");
            result.error = Some(CaptureFailure::CaptureUnavailable(e.to_string()));
            return Ok(result);
        }

        self.run(&mut state, result, Acquired::Temporary(temp), &stamp, persist)
            .await
    }

    /// Run the shared pipeline against a caller-supplied image. On
    /// acceptance the source image is copied (never moved) into the
    /// permanent image directory; the source is never modified.
    pub async fn process_existing(
        &self,
        image_path: &Path,
        persist: bool,
    ) -> Result<CaptureResult, PipelineError> {
        let mut state = self.state.lock().await;

        let timestamp = Utc::now();
        let stamp = self.stamp(&timestamp);
        let result = CaptureResult::empty(timestamp);

        self.run(
            &mut state,
            result,
            Acquired::Existing(image_path.to_path_buf()),
            &stamp,
            persist,
        )
        .await
    }

    fn stamp(&self, timestamp: &chrono::DateTime<Utc>) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}_{:04}", timestamp.format("%Y%m%d_%H%M%S"), seq)
    }

    /// The shared decision pipeline. Side effects run in a fixed order:
    /// recognition, then embedding/similarity, then file relocation, then
    /// the durable write, then the state update. The image file always
    /// exists before the log row that references it is written; a crash
    /// in between orphans a file but never dangles a row.
    async fn run(
        &self,
        state: &mut PipelineState,
        mut result: CaptureResult,
        acquired: Acquired,
        stamp: &str,
        persist: bool,
    ) -> Result<CaptureResult, PipelineError> {
        let text = match self.recognizer.recognize(acquired.image_path()).await {
            Ok(text) => text,
            Err(e) => {
                // Dropping `acquired` removes a pipeline-acquired temp;
                // recognition failure must never leak one.
                tracing::warn!(error = %e, "recognition failed");
                result.error = Some(CaptureFailure::RecognitionUnavailable(e.to_string()));
                return Ok(result);
            }
        };
        result.text = text;

        if result.text.trim().is_empty() {
            tracing::debug!("recognized text is empty; capture discarded");
            return Ok(result);
        }

        let embedding = match self.embedder.embed(&result.text).await {
            Ok(embedding) => Some(embedding),
            Err(e) => {
                // Degrade: similarity stays 0, so the acceptance decision
                // proceeds as if nothing comparable came before. The state
                // update below is skipped (there is no embedding to keep).
                tracing::warn!(error = %e, "embedding failed; proceeding at similarity 0");
                result.error = Some(CaptureFailure::EmbeddingUnavailable(e.to_string()));
                None
            }
        };

        if let (Some(embedding), Some(last)) = (&embedding, &state.last_embedding) {
            result.similarity = cosine_similarity(embedding, last).clamp(0.0, 1.0);
        }

        // The acceptance rule: strict less-than, equality rejects.
        let accept = persist
            && (state.last_embedding.is_none()
                || result.similarity < self.config.similarity_threshold);

        if !accept {
            tracing::debug!(
                similarity = result.similarity,
                persist,
                "capture rejected as duplicate"
            );
            return Ok(result);
        }

        let permanent = self.config.images_dir.join(format!("image_{}.png", stamp));
        match acquired {
            Acquired::Temporary(temp) => temp.promote(&permanent)?,
            Acquired::Existing(source) => {
                std::fs::copy(&source, &permanent)?;
            }
        }

        {
            let store = self
                .store
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            store.append_capture(result.timestamp, &permanent, &result.text)?;
        }

        if let Some(embedding) = embedding {
            state.last_embedding = Some(embedding);
        }
        tracing::info!(
            similarity = result.similarity,
            path = %permanent.display(),
            "capture accepted"
        );
        result.image_path = Some(permanent);

        Ok(result)
    }
}
