//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Glimpse - capture, deduplicate, and persist what crosses your screen.
#[derive(Debug, Parser)]
#[command(name = "glimpse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ~/.glimpse/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture the screen periodically, storing non-duplicate captures
    Watch(WatchArgs),

    /// Run one capture (or process an existing image) through the pipeline
    Capture(CaptureArgs),

    /// Extract normalized text from a document file
    Ingest(IngestArgs),

    /// Print the turns of a conversation session
    History(HistoryArgs),

    /// Append a turn to a conversation session
    Log(LogArgs),

    /// Ask a question against a session's history
    Ask(AskArgs),

    /// Summarize a user's GitHub activity over a date range
    Activity(ActivityArgs),

    /// List recent entries from the capture log
    Captures(CapturesArgs),
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Seconds between captures
    #[arg(short, long, default_value_t = 60)]
    pub interval: u64,

    /// Run the pipeline without persisting anything
    #[arg(long)]
    pub no_store: bool,
}

/// Arguments for the capture command.
#[derive(Debug, Parser)]
pub struct CaptureArgs {
    /// Process this existing image instead of taking a screenshot
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Run the pipeline without persisting anything
    #[arg(long)]
    pub no_store: bool,
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Document to extract text from
    pub file: PathBuf,
}

/// Arguments for the history command.
#[derive(Debug, Parser)]
pub struct HistoryArgs {
    /// Session to read
    pub session: String,

    /// Cap the number of turns returned (oldest first)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the log command.
#[derive(Debug, Parser)]
pub struct LogArgs {
    /// Session to append to
    pub session: String,

    /// Speaker: "user" or "assistant"
    pub role: String,

    /// Turn content
    pub message: String,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Session whose history becomes the context
    pub session: String,

    /// Question to answer
    pub question: String,
}

/// Arguments for the activity command.
#[derive(Debug, Parser)]
pub struct ActivityArgs {
    /// GitHub username
    pub username: String,

    /// Start date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub since: String,

    /// End date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub until: String,

    /// Restrict to these repositories (repeatable)
    #[arg(long = "repo")]
    pub repos: Vec<String>,

    /// GitHub token (falls back to the GITHUB_TOKEN environment variable)
    #[arg(long, env = "GITHUB_TOKEN")]
    pub token: Option<String>,
}

/// Arguments for the captures command.
#[derive(Debug, Parser)]
pub struct CapturesArgs {
    /// Number of entries to show, newest first
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}
