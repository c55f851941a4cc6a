//! CLI Adapter
//!
//! Command-line interface for the Magpie contract tooling.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, TokensCmd, ScaleCmd, QuoteCmd, QuoteInCmd};

use anyhow::Result;

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    commands::execute(app).await
}
