//! magpie-contract - Magpie aggregator probe CLI
//!
//! Token catalog lookups, minor-unit amount scaling and quote requests
//! against the Magpie swap aggregator API.

use anyhow::Result;
use clap::Parser;

use magpie_contract::adapters::cli::{self, CliApp};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (MAGPIE_API_URL, RUST_LOG)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    cli::execute(app).await
}
