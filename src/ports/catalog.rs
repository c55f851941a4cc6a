//! Token Catalog Port
//!
//! Resolves a network (and optional search filter) into the ordered token
//! list served by the token manager. Every call is a fresh fetch.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::token::{NetworkName, TokenQuery, TokenRecord};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Token catalog unavailable for network '{network}': HTTP {status}")]
    CatalogUnavailable { network: String, status: u16 },

    #[error("Token index {index} out of range for network '{network}' (catalog has {len} tokens)")]
    IndexOutOfRange {
        network: String,
        index: usize,
        len: usize,
    },

    #[error("Malformed token record at {network}[{index}]: missing or invalid '{field}'")]
    MalformedRecord {
        network: String,
        index: usize,
        field: &'static str,
    },

    #[error("Token catalog request failed: {0}")]
    Transport(String),

    #[error("Failed to parse token catalog for network '{network}': {message}")]
    ParseError { network: String, message: String },
}

/// One catalog fetch, in the order the remote service returned it
///
/// Entries are kept as raw JSON so a single bad record does not poison the
/// whole listing; validation happens when a record is indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenCatalog {
    network: String,
    entries: Vec<Value>,
}

impl TokenCatalog {
    pub fn new(network: impl Into<String>, entries: Vec<Value>) -> Self {
        Self {
            network: network.into(),
            entries,
        }
    }

    /// Network label the catalog was fetched for
    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validated record at `index`
    pub fn token_at(&self, index: usize) -> Result<TokenRecord, CatalogError> {
        let entry = self
            .entries
            .get(index)
            .ok_or_else(|| CatalogError::IndexOutOfRange {
                network: self.network.clone(),
                index,
                len: self.entries.len(),
            })?;

        self.to_record(index, entry)
    }

    /// All records, failing on the first malformed one
    pub fn records(&self) -> Result<Vec<TokenRecord>, CatalogError> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| self.to_record(index, entry))
            .collect()
    }

    fn to_record(&self, index: usize, entry: &Value) -> Result<TokenRecord, CatalogError> {
        let malformed = |field: &'static str| CatalogError::MalformedRecord {
            network: self.network.clone(),
            index,
            field,
        };

        let mut fields: Map<String, Value> = entry.as_object().cloned().ok_or_else(|| malformed("address"))?;

        let address = match fields.remove("address") {
            Some(Value::String(address)) if !address.trim().is_empty() => address,
            _ => return Err(malformed("address")),
        };

        // Some networks report decimals as a numeric string
        let decimals = match fields.remove("decimals") {
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| malformed("decimals"))?,
            Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| malformed("decimals"))?,
            _ => return Err(malformed("decimals")),
        };

        let mut take_string = |key: &str| match fields.remove(key) {
            Some(Value::String(s)) => Some(s),
            Some(other) if !other.is_null() => Some(other.to_string()),
            _ => None,
        };

        let symbol = take_string("symbol");
        let name = take_string("name");
        let network = take_string("network");

        Ok(TokenRecord {
            address,
            decimals,
            symbol,
            name,
            network,
            extra: fields.into_iter().collect(),
        })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenCatalogPort: Send + Sync {
    /// Fetch the catalog for the networks named in `query`
    async fn fetch_catalog(&self, query: &TokenQuery) -> Result<TokenCatalog, CatalogError>;

    /// Fetch the unfiltered catalog for `network` and index into it
    async fn token_at(&self, network: &NetworkName, index: usize) -> Result<TokenRecord, CatalogError> {
        let catalog = self
            .fetch_catalog(&TokenQuery::for_network(network.clone()))
            .await?;
        catalog.token_at(index)
    }
}
