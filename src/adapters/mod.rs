//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Magpie: token catalog and aggregator quote client
//! - Logging: tracing-backed API observer
//! - CLI: Command-line interface handlers

pub mod magpie;
pub mod logging;
pub mod cli;

pub use magpie::{MagpieClient, MagpieConfig};
pub use logging::TracingObserver;
pub use cli::CliApp;
