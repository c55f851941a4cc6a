//! Token Types
//!
//! Network identifiers, catalog queries and validated token records.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Network used when a scenario does not name one
pub const DEFAULT_NETWORK: &str = "bsc";

/// Opaque blockchain network identifier (e.g. "bsc", "ethereum")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkName(String);

impl NetworkName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NetworkName {
    fn default() -> Self {
        Self::new(DEFAULT_NETWORK)
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NetworkName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NetworkName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for NetworkName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Body of a token-manager search request
///
/// Built fresh for every catalog fetch. An empty `search_value` means
/// "unfiltered" and goes over the wire as `[""]`, which is what the
/// token manager expects for a full listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuery {
    pub network_names: Vec<NetworkName>,
    #[serde(serialize_with = "serialize_search_value")]
    pub search_value: Vec<String>,
    pub exact: bool,
    pub offset: u64,
    pub exclude: Vec<String>,
}

impl TokenQuery {
    /// Unfiltered listing for a single network
    pub fn for_network(network: impl Into<NetworkName>) -> Self {
        Self {
            network_names: vec![network.into()],
            search_value: Vec::new(),
            exact: false,
            offset: 0,
            exclude: Vec::new(),
        }
    }

    /// Add a search term
    pub fn with_search(mut self, value: impl Into<String>) -> Self {
        self.search_value.push(value.into());
        self
    }

    /// Require exact matches on the search terms
    pub fn with_exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    /// Skip the first `offset` catalog entries
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Exclude a token address from the results
    pub fn excluding(mut self, address: impl Into<String>) -> Self {
        self.exclude.push(address.into());
        self
    }

    /// Networks joined for diagnostics ("bsc,ethereum")
    pub fn network_label(&self) -> String {
        self.network_names
            .iter()
            .map(NetworkName::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for TokenQuery {
    fn default() -> Self {
        Self::for_network(NetworkName::default())
    }
}

fn serialize_search_value<S: Serializer>(values: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    if values.is_empty() {
        [""].serialize(serializer)
    } else {
        values.serialize(serializer)
    }
}

/// A validated catalog token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Chain-specific token contract address
    pub address: String,
    /// Power-of-ten exponent between display units and minor units.
    /// Kept signed so that bad catalog data surfaces at scaling time.
    pub decimals: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl TokenRecord {
    pub fn new(address: impl Into<String>, decimals: i64) -> Self {
        Self {
            address: address.into(),
            decimals,
            symbol: None,
            name: None,
            network: None,
            extra: HashMap::new(),
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Symbol if the catalog supplied one, otherwise the address
    pub fn label(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfiltered_query_wire_format() {
        let query = TokenQuery::for_network("bsc");
        let json = serde_json::to_value(&query).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "networkNames": ["bsc"],
                "searchValue": [""],
                "exact": false,
                "offset": 0,
                "exclude": []
            })
        );
    }

    #[test]
    fn test_query_builder() {
        let query = TokenQuery::for_network("ethereum")
            .with_search("USDC")
            .with_exact(true)
            .with_offset(20)
            .excluding("0xdead");

        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["searchValue"], serde_json::json!(["USDC"]));
        assert_eq!(json["exact"], true);
        assert_eq!(json["offset"], 20);
        assert_eq!(json["exclude"], serde_json::json!(["0xdead"]));
    }

    #[test]
    fn test_default_query_targets_bsc() {
        let query = TokenQuery::default();
        assert_eq!(query.network_label(), "bsc");
    }

    #[test]
    fn test_network_label_joins_names() {
        let mut query = TokenQuery::for_network("bsc");
        query.network_names.push("ethereum".into());
        assert_eq!(query.network_label(), "bsc,ethereum");
    }

    #[test]
    fn test_token_record_keeps_unknown_fields() {
        let json = r#"{
            "address": "0x55d398326f99059ff775485246999027b3197955",
            "decimals": 18,
            "symbol": "USDT",
            "logoUri": "https://example.com/usdt.png"
        }"#;

        let record: TokenRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.decimals, 18);
        assert_eq!(record.label(), "USDT");
        assert!(record.extra.contains_key("logoUri"));
    }

    #[test]
    fn test_label_falls_back_to_address() {
        let record = TokenRecord::new("0xabc", 6);
        assert_eq!(record.label(), "0xabc");
    }
}
