//! Magpie API Client
//!
//! HTTP client for the Magpie aggregator: token-manager catalog search plus
//! the `/aggregator/quote` and `/aggregator/quote-in` endpoints.
//! No retries and no caching; every call goes to the network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::domain::quote::{ApiResponse, QuoteError, QuoteInRequest, QuoteRequest};
use crate::domain::token::TokenQuery;
use crate::ports::catalog::{CatalogError, TokenCatalog, TokenCatalogPort};
use crate::ports::observer::{ApiObserver, NoopObserver};
use crate::ports::quote::QuotePort;

pub const DEFAULT_API_BASE_URL: &str = "https://api.magpiefi.xyz";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "MAGPIE_API_URL";

const TOKENS_PATH: &str = "/token-manager/tokens";
const QUOTE_PATH: &str = "/aggregator/quote";
const QUOTE_IN_PATH: &str = "/aggregator/quote-in";

#[derive(Debug, Error)]
pub enum MagpieError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Magpie API client configuration
#[derive(Debug, Clone)]
pub struct MagpieConfig {
    /// Base URL for the Magpie API (no trailing slash)
    pub api_base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for MagpieConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl MagpieConfig {
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Default config, with the base URL taken from `MAGPIE_API_URL` when set
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(url.trim()),
            _ => Self::default(),
        }
    }
}

/// Magpie aggregator client
#[derive(Debug, Clone)]
pub struct MagpieClient {
    config: MagpieConfig,
    http: Client,
    observer: Arc<dyn ApiObserver>,
}

impl MagpieClient {
    /// Create a new Magpie client with default configuration
    pub fn new() -> Result<Self, MagpieError> {
        Self::with_config(MagpieConfig::default())
    }

    /// Create a new Magpie client with custom configuration
    pub fn with_config(config: MagpieConfig) -> Result<Self, MagpieError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            http,
            observer: Arc::new(NoopObserver),
        })
    }

    /// Report requests and responses to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn ApiObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Get the configured API base URL
    pub fn api_base_url(&self) -> &str {
        &self.config.api_base_url
    }

    /// Search the token manager
    pub async fn fetch_catalog(&self, query: &TokenQuery) -> Result<TokenCatalog, CatalogError> {
        let url = self.url(TOKENS_PATH);
        let network = query.network_label();

        self.observer.on_request(
            TOKENS_PATH,
            &[
                ("networkNames", network.clone()),
                ("searchValue", query.search_value.join(",")),
                ("offset", query.offset.to_string()),
            ],
        );

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(query)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        self.observer.on_response(TOKENS_PATH, status.as_u16(), &body);

        if !status.is_success() {
            tracing::warn!(network = %network, status = status.as_u16(), "token catalog request failed");
            return Err(CatalogError::CatalogUnavailable {
                network,
                status: status.as_u16(),
            });
        }

        let entries: Vec<Value> = serde_json::from_str(&body).map_err(|e| CatalogError::ParseError {
            network: network.clone(),
            message: e.to_string(),
        })?;

        self.observer.on_catalog(&network, entries.len());
        tracing::debug!(network = %network, tokens = entries.len(), "fetched token catalog");

        Ok(TokenCatalog::new(network, entries))
    }

    /// `GET /aggregator/quote`
    pub async fn get_quote(&self, request: &QuoteRequest) -> Result<ApiResponse, QuoteError> {
        self.get(QUOTE_PATH, request.query_params()).await
    }

    /// `GET /aggregator/quote-in`
    pub async fn get_quote_in(&self, request: &QuoteInRequest) -> Result<ApiResponse, QuoteError> {
        self.get(QUOTE_IN_PATH, request.query_params()).await
    }

    async fn get(&self, path: &str, params: Vec<(&'static str, String)>) -> Result<ApiResponse, QuoteError> {
        let url = self.url(path);
        self.observer.on_request(path, &params);

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&params)
            .send()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        self.observer.on_response(path, status, &body);

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }
}

#[async_trait]
impl TokenCatalogPort for MagpieClient {
    async fn fetch_catalog(&self, query: &TokenQuery) -> Result<TokenCatalog, CatalogError> {
        MagpieClient::fetch_catalog(self, query).await
    }
}

#[async_trait]
impl QuotePort for MagpieClient {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<ApiResponse, QuoteError> {
        MagpieClient::get_quote(self, request).await
    }

    async fn get_quote_in(&self, request: &QuoteInRequest) -> Result<ApiResponse, QuoteError> {
        MagpieClient::get_quote_in(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magpie_config_default() {
        let config = MagpieConfig::default();
        assert_eq!(config.api_base_url, "https://api.magpiefi.xyz");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = MagpieConfig::with_base_url("http://127.0.0.1:8080/");
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_magpie_client_creation() {
        let client = MagpieClient::new();
        assert!(client.is_ok());
        assert_eq!(client.unwrap().api_base_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_endpoint_urls() {
        let client = MagpieClient::with_config(MagpieConfig::with_base_url("http://localhost:9")).unwrap();
        assert_eq!(client.url(TOKENS_PATH), "http://localhost:9/token-manager/tokens");
        assert_eq!(client.url(QUOTE_IN_PATH), "http://localhost:9/aggregator/quote-in");
    }
}
