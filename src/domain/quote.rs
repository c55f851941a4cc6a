//! Quote Types
//!
//! Request parameters and response shapes for the aggregator `/quote` and
//! `/quote-in` endpoints.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::token::NetworkName;

/// Domain error code: no route found for the requested amountIn
pub const NO_ROUTE_FOR_AMOUNT: i64 = 2069;

/// Domain error code: cross-network amount below the bridge minimum
pub const BELOW_MINIMUM_AMOUNT: i64 = 2121;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Quote request failed: {0}")]
    Transport(String),

    #[error("Failed to parse quote response: {0}")]
    ParseError(String),
}

/// Parameters for `GET /aggregator/quote`
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub network: NetworkName,
    pub from_token_address: String,
    pub to_token_address: String,
    /// Sell amount in minor units, plain notation
    pub sell_amount: String,
    /// Slippage tolerance in percent (0.5 = 0.5%)
    pub slippage: Decimal,
    pub gasless: bool,
}

impl QuoteRequest {
    pub fn new(
        network: impl Into<NetworkName>,
        from_token_address: impl Into<String>,
        to_token_address: impl Into<String>,
        sell_amount: impl Into<String>,
    ) -> Self {
        Self {
            network: network.into(),
            from_token_address: from_token_address.into(),
            to_token_address: to_token_address.into(),
            sell_amount: sell_amount.into(),
            slippage: Decimal::new(5, 1),
            gasless: false,
        }
    }

    pub fn with_slippage(mut self, slippage: Decimal) -> Self {
        self.slippage = slippage;
        self
    }

    pub fn with_gasless(mut self, gasless: bool) -> Self {
        self.gasless = gasless;
        self
    }

    /// Query string pairs in the order the endpoint documents them
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("network", self.network.to_string()),
            ("fromTokenAddress", self.from_token_address.clone()),
            ("toTokenAddress", self.to_token_address.clone()),
            ("sellAmount", self.sell_amount.clone()),
            ("slippage", self.slippage.to_string()),
            ("gasless", self.gasless.to_string()),
        ]
    }
}

/// Parameters for `GET /aggregator/quote-in` (cross-network)
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteInRequest {
    pub from_network: NetworkName,
    pub to_network: NetworkName,
    pub from_token_address: String,
    pub to_token_address: String,
    pub sell_amount: String,
    pub slippage_in: Decimal,
    pub slippage_out: Decimal,
    pub gasless: bool,
    /// Empty means "any source"
    pub liquidity_sources: Vec<String>,
    pub bridge_types: Vec<u32>,
}

impl QuoteInRequest {
    pub fn new(
        from_network: impl Into<NetworkName>,
        to_network: impl Into<NetworkName>,
        from_token_address: impl Into<String>,
        to_token_address: impl Into<String>,
        sell_amount: impl Into<String>,
    ) -> Self {
        Self {
            from_network: from_network.into(),
            to_network: to_network.into(),
            from_token_address: from_token_address.into(),
            to_token_address: to_token_address.into(),
            sell_amount: sell_amount.into(),
            slippage_in: Decimal::new(5, 1),
            slippage_out: Decimal::new(5, 2),
            gasless: false,
            liquidity_sources: Vec::new(),
            bridge_types: vec![1],
        }
    }

    pub fn with_slippage(mut self, slippage_in: Decimal, slippage_out: Decimal) -> Self {
        self.slippage_in = slippage_in;
        self.slippage_out = slippage_out;
        self
    }

    pub fn with_gasless(mut self, gasless: bool) -> Self {
        self.gasless = gasless;
        self
    }

    pub fn with_bridge_types(mut self, bridge_types: Vec<u32>) -> Self {
        self.bridge_types = bridge_types;
        self
    }

    pub fn with_liquidity_source(mut self, source: impl Into<String>) -> Self {
        self.liquidity_sources.push(source.into());
        self
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let bridge_types = self
            .bridge_types
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");

        vec![
            ("fromNetwork", self.from_network.to_string()),
            ("toNetwork", self.to_network.to_string()),
            ("fromTokenAddress", self.from_token_address.clone()),
            ("toTokenAddress", self.to_token_address.clone()),
            ("sellAmount", self.sell_amount.clone()),
            ("slippageIn", self.slippage_in.to_string()),
            ("slippageOut", self.slippage_out.to_string()),
            ("gasless", self.gasless.to_string()),
            ("liquiditySources", self.liquidity_sources.join(",")),
            ("bridgeTypes", bridge_types),
        ]
    }
}

/// Successful quote payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    /// Output amount; the API has sent both strings and numbers here
    #[serde(deserialize_with = "string_or_number")]
    pub amount_out: String,
    /// Router contract the swap must be sent to
    pub target_address: String,
    pub fees: Vec<Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Domain-level failure payload (`{code, message}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    /// Validation failures arrive as a list of messages; they are joined with "; "
    #[serde(default, deserialize_with = "message_or_list")]
    pub message: String,
}

impl ApiErrorBody {
    pub fn has_code(&self, code: i64) -> bool {
        self.code == Some(code)
    }
}

/// What a quote endpoint answered with
#[derive(Debug, Clone)]
pub enum QuoteOutcome {
    Quote(QuoteResponse),
    Rejected(ApiErrorBody),
}

/// Raw HTTP answer from a quote endpoint
///
/// Non-2xx statuses are kept rather than turned into errors because the
/// contract tests assert on them directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }

    pub fn body_contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }

    pub fn json(&self) -> Result<Value, QuoteError> {
        serde_json::from_str(&self.body).map_err(|e| {
            QuoteError::ParseError(format!(
                "HTTP {} body is not JSON ({}): {}",
                self.status,
                e,
                self.body.chars().take(200).collect::<String>()
            ))
        })
    }

    /// Top-level JSON field, `None` if absent, null, or the body is not JSON
    pub fn field(&self, name: &str) -> Option<Value> {
        self.json()
            .ok()
            .and_then(|v| v.get(name).cloned())
            .filter(|v| !v.is_null())
    }

    /// Numeric `code` field of a domain error body
    pub fn error_code(&self) -> Option<i64> {
        self.field("code").and_then(|v| v.as_i64())
    }

    /// Classify the body as a quote or a rejection
    pub fn outcome(&self) -> Result<QuoteOutcome, QuoteError> {
        let json = self.json()?;

        if self.is_success() && json.get("amountOut").is_some() {
            let quote = serde_json::from_value(json)
                .map_err(|e| QuoteError::ParseError(format!("quote payload: {}", e)))?;
            return Ok(QuoteOutcome::Quote(quote));
        }

        let rejection = serde_json::from_value(json)
            .map_err(|e| QuoteError::ParseError(format!("error payload: {}", e)))?;
        Ok(QuoteOutcome::Rejected(rejection))
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn message_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; ")),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}
