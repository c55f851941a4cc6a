//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement:
//! - Token catalog lookups (token-manager search)
//! - Aggregator quoting (quote, quote-in)
//! - Instrumentation sink for request/response events

pub mod catalog;
pub mod quote;
pub mod observer;
pub mod mocks;

pub use catalog::{CatalogError, TokenCatalog, TokenCatalogPort};
pub use quote::QuotePort;
pub use observer::{ApiObserver, NoopObserver};
