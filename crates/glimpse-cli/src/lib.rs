//! Glimpse CLI - command-line interface for the capture pipeline.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::{Cli, Command};
pub use config::GlimpseConfig;
pub use error::{CliError, Result};
