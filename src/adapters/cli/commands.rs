//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the Magpie contract tooling.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::adapters::logging::TracingObserver;
use crate::adapters::magpie::{MagpieClient, MagpieConfig};
use crate::application::{QuoteInScenario, QuoteScenario, TokenDataProvider};
use crate::config::{load_config_or_default, Config};
use crate::domain::amount::parse_amount;
use crate::domain::quote::ApiResponse;
use crate::domain::token::{NetworkName, TokenQuery};

/// Magpie contract - token catalog, amount scaling and quote probes
#[derive(Parser, Debug)]
#[command(
    name = "magpie-contract",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Probe the Magpie swap aggregator API",
    long_about = "Looks up tokens in the Magpie token manager, scales display amounts into \
                  minor units using catalog decimals, and sends quote / quote-in requests \
                  built from catalog positions."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE", default_value = "config/magpie.toml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the token catalog for a network
    Tokens(TokensCmd),

    /// Resolve a catalog token and scale an amount into its minor units
    Scale(ScaleCmd),

    /// Request a single-network quote
    Quote(QuoteCmd),

    /// Request a cross-network quote
    QuoteIn(QuoteInCmd),
}

/// List tokens
#[derive(Parser, Debug)]
pub struct TokensCmd {
    /// Network name (e.g., bsc)
    #[arg(value_name = "NETWORK")]
    pub network: Option<String>,

    /// Search term (symbol, name or address)
    #[arg(short, long, value_name = "TERM")]
    pub search: Option<String>,

    /// Only exact matches for the search term
    #[arg(long)]
    pub exact: bool,

    /// Skip the first N catalog entries
    #[arg(long, value_name = "N", default_value = "0")]
    pub offset: u64,

    /// Maximum number of tokens to print
    #[arg(short, long, value_name = "N", default_value = "20")]
    pub limit: usize,
}

/// Scale an amount for a catalog token
#[derive(Parser, Debug)]
pub struct ScaleCmd {
    /// Network name (e.g., bsc)
    #[arg(value_name = "NETWORK")]
    pub network: String,

    /// Position of the token in the catalog
    #[arg(value_name = "INDEX")]
    pub index: usize,

    /// Amount in display units (e.g., 1.5)
    #[arg(value_name = "AMOUNT")]
    pub amount: String,
}

/// Get a single-network quote
#[derive(Parser, Debug)]
pub struct QuoteCmd {
    /// Network name (e.g., bsc)
    #[arg(value_name = "NETWORK")]
    pub network: String,

    /// Catalog position of the token to sell
    #[arg(value_name = "FROM_INDEX")]
    pub from_index: usize,

    /// Catalog position of the token to buy
    #[arg(value_name = "TO_INDEX")]
    pub to_index: usize,

    /// Amount to sell in display units
    #[arg(value_name = "AMOUNT")]
    pub amount: String,

    /// Slippage tolerance in percent
    #[arg(long, value_name = "PCT", default_value = "0.5")]
    pub slippage: Decimal,

    /// Request a gasless quote
    #[arg(long)]
    pub gasless: bool,

    /// Send AMOUNT as-is instead of scaling by token decimals
    #[arg(long)]
    pub raw: bool,
}

/// Get a cross-network quote
#[derive(Parser, Debug)]
pub struct QuoteInCmd {
    /// Source network (e.g., bsc)
    #[arg(value_name = "FROM_NETWORK")]
    pub from_network: String,

    /// Destination network (e.g., ethereum)
    #[arg(value_name = "TO_NETWORK")]
    pub to_network: String,

    /// Catalog position of the token to sell on the source network
    #[arg(value_name = "FROM_INDEX")]
    pub from_index: usize,

    /// Catalog position of the token to buy on the destination network
    #[arg(value_name = "TO_INDEX")]
    pub to_index: usize,

    /// Amount to sell in display units
    #[arg(value_name = "AMOUNT")]
    pub amount: String,

    /// Slippage tolerance on the source network, in percent
    #[arg(long, value_name = "PCT", default_value = "0.5")]
    pub slippage_in: Decimal,

    /// Slippage tolerance on the destination network, in percent
    #[arg(long, value_name = "PCT", default_value = "0.05")]
    pub slippage_out: Decimal,

    /// Request a gasless quote
    #[arg(long)]
    pub gasless: bool,

    /// Bridge type identifier
    #[arg(long, value_name = "ID", default_value = "1")]
    pub bridge_type: u32,

    /// Send AMOUNT as-is instead of scaling by token decimals
    #[arg(long)]
    pub raw: bool,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    let config_path = shellexpand::tilde(&app.config.to_string_lossy()).to_string();
    let config = load_config_or_default(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Tokens(cmd) => tokens_command(&config, cmd).await,
        Command::Scale(cmd) => scale_command(&config, cmd).await,
        Command::Quote(cmd) => quote_command(&config, cmd).await,
        Command::QuoteIn(cmd) => quote_in_command(&config, cmd).await,
    }
}

/// Initialize logging system
fn init_logging(verbose: bool, debug: bool, configured: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        configured
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn build_client(config: &Config) -> Result<MagpieClient> {
    let client = MagpieClient::with_config(MagpieConfig::from(&config.api))
        .context("Failed to create Magpie client")?
        .with_observer(Arc::new(TracingObserver));
    Ok(client)
}

fn build_provider(config: &Config) -> Result<TokenDataProvider<MagpieClient>> {
    Ok(TokenDataProvider::new(build_client(config)?)
        .with_default_network(config.catalog.default_network.as_str()))
}

async fn tokens_command(config: &Config, cmd: TokensCmd) -> Result<()> {
    let provider = build_provider(config)?;
    let network = cmd
        .network
        .map(NetworkName::from)
        .unwrap_or_else(|| provider.default_network().clone());

    let mut query = TokenQuery::for_network(network.clone())
        .with_exact(cmd.exact)
        .with_offset(cmd.offset);
    if let Some(term) = cmd.search {
        query = query.with_search(term);
    }

    let catalog = provider
        .search(&query)
        .await
        .with_context(|| format!("Failed to fetch token catalog for {}", network))?;

    println!("Network: {} ({} tokens)", network, catalog.len());
    for index in 0..catalog.len().min(cmd.limit) {
        match catalog.token_at(index) {
            Ok(token) => println!(
                "  [{:>3}] {:<12} {:>3} decimals  {}",
                index,
                token.symbol.as_deref().unwrap_or("-"),
                token.decimals,
                token.address
            ),
            Err(e) => println!("  [{:>3}] <malformed: {}>", index, e),
        }
    }

    Ok(())
}

async fn scale_command(config: &Config, cmd: ScaleCmd) -> Result<()> {
    let provider = build_provider(config)?;
    let amount = parse_amount(&cmd.amount)?;
    let network = NetworkName::from(cmd.network);

    let resolved = provider
        .resolve(&network, cmd.index, &amount)
        .await
        .with_context(|| format!("Failed to resolve {}[{}]", network, cmd.index))?;

    println!("Token:       {} ({})", resolved.record.label(), resolved.record.address);
    println!("Decimals:    {}", resolved.record.decimals);
    println!("Amount:      {}", cmd.amount);
    println!("Sell amount: {}", resolved.sell_amount);

    Ok(())
}

async fn quote_command(config: &Config, cmd: QuoteCmd) -> Result<()> {
    let provider = build_provider(config)?;
    let amount = parse_amount(&cmd.amount)?;

    let scenario = if cmd.raw {
        QuoteScenario::raw(cmd.network.as_str(), cmd.from_index, cmd.to_index, amount)
    } else {
        QuoteScenario::new(cmd.network.as_str(), cmd.from_index, cmd.to_index, amount)
    }
    .with_slippage(cmd.slippage)
    .with_gasless(cmd.gasless);

    let request = provider
        .quote_request(&scenario)
        .await
        .context("Failed to build quote request")?;
    let response = provider
        .catalog()
        .get_quote(&request)
        .await
        .context("Failed to get quote")?;

    print_response(&response);
    Ok(())
}

async fn quote_in_command(config: &Config, cmd: QuoteInCmd) -> Result<()> {
    let provider = build_provider(config)?;
    let amount = parse_amount(&cmd.amount)?;

    let from_network = cmd.from_network.as_str();
    let to_network = cmd.to_network.as_str();
    let scenario = if cmd.raw {
        QuoteInScenario::raw(from_network, to_network, cmd.from_index, cmd.to_index, amount)
    } else {
        QuoteInScenario::new(from_network, to_network, cmd.from_index, cmd.to_index, amount)
    }
    .with_slippage(cmd.slippage_in, cmd.slippage_out)
    .with_gasless(cmd.gasless)
    .with_bridge_type(cmd.bridge_type);

    let request = provider
        .quote_in_request(&scenario)
        .await
        .context("Failed to build quote-in request")?;
    let response = provider
        .catalog()
        .get_quote_in(&request)
        .await
        .context("Failed to get cross-network quote")?;

    print_response(&response);
    Ok(())
}

fn print_response(response: &ApiResponse) {
    println!("Status:       {}", response.status);
    println!(
        "Content-Type: {}",
        response.content_type.as_deref().unwrap_or("-")
    );

    match response.json() {
        Ok(json) => match serde_json::to_string_pretty(&json) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", response.body),
        },
        Err(_) => println!("{}", response.body),
    }
}
