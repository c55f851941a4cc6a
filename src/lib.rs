//! Magpie Contract - token catalog, amount scaling and quote probes for the
//! Magpie swap aggregator API
//!
//! # Modules
//!
//! - `domain`: Token records, catalog queries, quote types and amount scaling
//! - `ports`: Trait abstractions (TokenCatalogPort, QuotePort, ApiObserver)
//! - `adapters`: External implementations (Magpie HTTP client, tracing observer, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Scenario token data provider

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
