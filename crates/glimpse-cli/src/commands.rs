//! Command implementations.

use crate::cli::{
    ActivityArgs, AskArgs, CaptureArgs, CapturesArgs, HistoryArgs, IngestArgs, LogArgs, WatchArgs,
};
use crate::config::{EmbedderKind, GlimpseConfig};
use crate::error::{CliError, Result};
use chrono::NaiveDate;
use glimpse_domain::{CaptureResult, Role};
use glimpse_github::ActivityClient;
use glimpse_llm::{AnswerChain, OllamaChain};
use glimpse_pipeline::Pipeline;
use glimpse_store::SqliteStore;
use glimpse_vision::{CommandCapture, HashEmbedder, OllamaEmbedder, TesseractRecognizer};
use std::sync::Arc;
use std::time::Duration;

/// Assemble the pipeline from the configured collaborators.
pub fn build_pipeline(config: &GlimpseConfig) -> Result<Pipeline> {
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::new(&config.db_path)?;

    let capture = Arc::new(CommandCapture::new(
        config.capture.command.clone(),
        config.capture.args.clone(),
    ));
    let recognizer = Arc::new(
        TesseractRecognizer::new(config.ocr.command.clone())
            .with_timeout(Duration::from_secs(config.ocr.timeout_secs)),
    );
    let embedder: Arc<dyn glimpse_domain::Embedder> = match config.embedder.kind {
        EmbedderKind::Hash => Arc::new(HashEmbedder::new(config.embedder.dimension)),
        EmbedderKind::Ollama => Arc::new(OllamaEmbedder::new(
            config.embedder.endpoint.clone(),
            config.embedder.model.clone(),
        )),
    };

    Ok(Pipeline::new(
        capture,
        recognizer,
        embedder,
        store,
        config.pipeline.clone(),
    )?)
}

fn describe(result: &CaptureResult) -> String {
    // A capture can be stored and still carry a failure tag (embedding
    // unavailable degrades to similarity 0), so check storage first.
    if let Some(path) = &result.image_path {
        let mut line = format!(
            "stored (similarity {:.3}) -> {}",
            result.similarity,
            path.display()
        );
        if let Some(error) = &result.error {
            line.push_str(&format!(" [{}]", error));
        }
        return line;
    }
    if let Some(error) = &result.error {
        return format!("failed: {}", error);
    }
    if result.text.trim().is_empty() {
        return "discarded: no text recognized".to_string();
    }
    format!("discarded as duplicate (similarity {:.3})", result.similarity)
}

/// Run the capture pipeline on a fixed interval until Ctrl+C.
pub async fn execute_watch(args: WatchArgs, config: &GlimpseConfig) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let persist = !args.no_store;
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval.max(1)));

    tracing::info!(interval_secs = args.interval, persist, "watch started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match pipeline.capture_and_process(persist).await {
                    Ok(result) => tracing::info!("{}", describe(&result)),
                    Err(e) => tracing::error!("capture cycle failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received, stopping watch");
                break;
            }
        }
    }

    Ok(())
}

/// Run one image through the pipeline.
pub async fn execute_capture(args: CaptureArgs, config: &GlimpseConfig) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let persist = !args.no_store;

    let result = match &args.image {
        Some(image) => pipeline.process_existing(image, persist).await?,
        None => pipeline.capture_and_process(persist).await?,
    };

    println!("{}", describe(&result));
    if !result.text.trim().is_empty() {
        println!("---\n{}", result.text.trim());
    }
    Ok(())
}

/// Extract normalized text from a document.
pub fn execute_ingest(args: IngestArgs) -> Result<()> {
    let text = glimpse_extract::extract_text(&args.file)?;
    println!("{}", text);
    Ok(())
}

/// Print a session's history, oldest first.
pub fn execute_history(args: HistoryArgs, config: &GlimpseConfig) -> Result<()> {
    let store = SqliteStore::new(&config.db_path)?;
    let turns = store.read_history(&args.session, args.limit)?;

    if turns.is_empty() {
        println!("no turns for session '{}'", args.session);
        return Ok(());
    }

    for turn in turns {
        println!(
            "[{}] {}: {}",
            turn.timestamp.format("%Y-%m-%d %H:%M:%S"),
            turn.role,
            turn.message
        );
    }
    Ok(())
}

/// Append one turn to a session.
pub fn execute_log(args: LogArgs, config: &GlimpseConfig) -> Result<()> {
    let role = Role::parse(&args.role).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "unknown role '{}' (expected 'user' or 'assistant')",
            args.role
        ))
    })?;

    let store = SqliteStore::new(&config.db_path)?;
    let id = store.append_turn(&args.session, role, &args.message, None)?;
    println!("logged turn {}", id);
    Ok(())
}

/// Answer a question against a session's history, recording both the
/// question and the answer as turns.
pub async fn execute_ask(args: AskArgs, config: &GlimpseConfig) -> Result<()> {
    let store = SqliteStore::new(&config.db_path)?;
    let history = store.read_history(&args.session, None)?;

    let context = history
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.message))
        .collect::<Vec<_>>()
        .join("\n");

    let chain = OllamaChain::new(config.llm.endpoint.clone(), config.llm.model.clone());
    let answer = chain.ask(&context, &args.question).await?;

    store.append_turn(&args.session, Role::User, &args.question, None)?;
    store.append_turn(&args.session, Role::Assistant, &answer, None)?;

    println!("{}", answer);
    Ok(())
}

/// Summarize a user's GitHub activity.
pub async fn execute_activity(args: ActivityArgs) -> Result<()> {
    let since = parse_date(&args.since)?;
    let until = parse_date(&args.until)?;
    let repos = if args.repos.is_empty() {
        None
    } else {
        Some(args.repos.as_slice())
    };

    let client = ActivityClient::new(args.token.clone());
    let summary = client
        .fetch_user_activity(&args.username, since, until, repos)
        .await?;

    println!(
        "{}: {} events between {} and {}",
        summary.username, summary.total_events, summary.since, summary.until
    );
    for (kind, count) in &summary.events_by_type {
        println!("  {:<24} {}", kind, count);
    }
    if !summary.events_by_repo.is_empty() {
        println!("by repository:");
        for (repo, count) in &summary.events_by_repo {
            println!("  {:<40} {}", repo, count);
        }
    }
    Ok(())
}

/// List recent capture log entries.
pub fn execute_captures(args: CapturesArgs, config: &GlimpseConfig) -> Result<()> {
    let store = SqliteStore::new(&config.db_path)?;
    let captures = store.recent_captures(args.limit)?;

    if captures.is_empty() {
        println!("capture log is empty");
        return Ok(());
    }

    for capture in captures {
        let preview: String = capture.extracted_text.chars().take(60).collect();
        println!(
            "#{} [{}] {} | {}",
            capture.id,
            capture.timestamp.format("%Y-%m-%d %H:%M:%S"),
            capture.image_path.display(),
            preview.replace('\n', " ")
        );
    }
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| CliError::InvalidInput(format!("invalid date '{}' (expected YYYY-MM-DD)", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_iso() {
        assert_eq!(
            parse_date("2024-05-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("May 1st").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn test_describe_stored_result() {
        let mut result = CaptureResult::empty(chrono::Utc::now());
        result.text = "text".into();
        result.image_path = Some("/images/image_x.png".into());
        result.similarity = 0.25;
        assert!(describe(&result).starts_with("stored (similarity 0.250)"));
    }

    #[test]
    fn test_describe_stored_degraded_result() {
        let mut result = CaptureResult::empty(chrono::Utc::now());
        result.text = "text".into();
        result.image_path = Some("/images/image_x.png".into());
        result.error = Some(glimpse_domain::CaptureFailure::EmbeddingUnavailable(
            "model missing".into(),
        ));
        let line = describe(&result);
        assert!(line.starts_with("stored"));
        assert!(line.contains("embedding unavailable"));
    }

    #[test]
    fn test_describe_duplicate_result() {
        let mut result = CaptureResult::empty(chrono::Utc::now());
        result.text = "text".into();
        result.similarity = 0.97;
        assert!(describe(&result).contains("duplicate"));
    }

    #[test]
    fn test_describe_empty_result() {
        let result = CaptureResult::empty(chrono::Utc::now());
        assert!(describe(&result).contains("no text"));
    }
}
