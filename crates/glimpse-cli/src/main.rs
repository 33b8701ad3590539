//! Glimpse command-line entry point.

use clap::Parser;
use glimpse_cli::cli::{Cli, Command};
use glimpse_cli::commands;
use glimpse_cli::config::GlimpseConfig;
use glimpse_cli::error::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => GlimpseConfig::default_path()?,
    };
    let config = GlimpseConfig::load(&config_path)?;

    match cli.command {
        Command::Watch(args) => commands::execute_watch(args, &config).await,
        Command::Capture(args) => commands::execute_capture(args, &config).await,
        Command::Ingest(args) => commands::execute_ingest(args),
        Command::History(args) => commands::execute_history(args, &config),
        Command::Log(args) => commands::execute_log(args, &config),
        Command::Ask(args) => commands::execute_ask(args, &config).await,
        Command::Activity(args) => commands::execute_activity(args).await,
        Command::Captures(args) => commands::execute_captures(args, &config),
    }
}
