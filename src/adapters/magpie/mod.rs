//! Magpie Adapter
//!
//! Implementation of the catalog and quote ports for the Magpie swap
//! aggregator HTTP API.

mod client;

pub use client::{MagpieClient, MagpieConfig, MagpieError, API_URL_ENV, DEFAULT_API_BASE_URL};
