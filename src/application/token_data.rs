//! Token Data Provider
//!
//! Scenario-facing helper that turns (network, catalog index, display amount)
//! into the addresses and minor-unit sell amounts a quote request needs.
//!
//! Everything a scenario derives from one network comes from ONE catalog
//! fetch: the remote ordering is not guaranteed stable between calls, so an
//! address and a decimals value taken from two different fetches may belong
//! to two different tokens.

use bigdecimal::BigDecimal;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::amount::{to_plain_string, AmountScaler, ScaleError, ScaledAmount};
use crate::domain::quote::{QuoteInRequest, QuoteRequest};
use crate::domain::token::{NetworkName, TokenQuery, TokenRecord};
use crate::ports::catalog::{CatalogError, TokenCatalog, TokenCatalogPort};

#[derive(Debug, Error)]
pub enum TokenDataError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Scale(#[from] ScaleError),
}

/// A catalog token together with a sell amount scaled for it
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedToken {
    pub record: TokenRecord,
    pub sell_amount: ScaledAmount,
}

/// Source and destination tokens of a quote
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPair {
    pub from: TokenRecord,
    pub to: TokenRecord,
}

/// How a scenario's amount reaches `sellAmount`
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioAmount {
    /// Display units, scaled by the source token's decimals
    Display(BigDecimal),
    /// Sent as-is in plain notation (used to probe the API's amount limits)
    Raw(BigDecimal),
}

/// Single-network `/quote` scenario
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteScenario {
    pub network: NetworkName,
    pub from_index: usize,
    pub to_index: usize,
    pub amount: ScenarioAmount,
    pub slippage: Decimal,
    pub gasless: bool,
}

impl QuoteScenario {
    pub fn new(network: impl Into<NetworkName>, from_index: usize, to_index: usize, amount: BigDecimal) -> Self {
        Self {
            network: network.into(),
            from_index,
            to_index,
            amount: ScenarioAmount::Display(amount),
            slippage: Decimal::new(5, 1),
            gasless: false,
        }
    }

    /// Scenario whose amount is sent unscaled
    pub fn raw(network: impl Into<NetworkName>, from_index: usize, to_index: usize, amount: BigDecimal) -> Self {
        Self {
            amount: ScenarioAmount::Raw(amount.clone()),
            ..Self::new(network, from_index, to_index, amount)
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
}

/// Cross-network `/quote-in` scenario
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteInScenario {
    pub from_network: NetworkName,
    pub to_network: NetworkName,
    pub from_index: usize,
    pub to_index: usize,
    pub amount: ScenarioAmount,
    pub slippage_in: Decimal,
    pub slippage_out: Decimal,
    pub gasless: bool,
    pub bridge_type: u32,
}

impl QuoteInScenario {
    pub fn new(
        from_network: impl Into<NetworkName>,
        to_network: impl Into<NetworkName>,
        from_index: usize,
        to_index: usize,
        amount: BigDecimal,
    ) -> Self {
        Self {
            from_network: from_network.into(),
            to_network: to_network.into(),
            from_index,
            to_index,
            amount: ScenarioAmount::Display(amount),
            slippage_in: Decimal::new(5, 1),
            slippage_out: Decimal::new(5, 2),
            gasless: false,
            bridge_type: 1,
        }
    }

    /// Scenario whose amount is sent unscaled
    pub fn raw(
        from_network: impl Into<NetworkName>,
        to_network: impl Into<NetworkName>,
        from_index: usize,
        to_index: usize,
        amount: BigDecimal,
    ) -> Self {
        Self {
            amount: ScenarioAmount::Raw(amount.clone()),
            ..Self::new(from_network, to_network, from_index, to_index, amount)
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

    pub fn with_bridge_type(mut self, bridge_type: u32) -> Self {
        self.bridge_type = bridge_type;
        self
    }
}

/// Looks up catalog tokens and scales amounts for test scenarios
#[derive(Debug, Clone)]
pub struct TokenDataProvider<C> {
    catalog: C,
    scaler: AmountScaler,
    default_network: NetworkName,
}

impl<C: TokenCatalogPort> TokenDataProvider<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            scaler: AmountScaler::default(),
            default_network: NetworkName::default(),
        }
    }

    pub fn with_default_network(mut self, network: impl Into<NetworkName>) -> Self {
        self.default_network = network.into();
        self
    }

    pub fn with_scaler(mut self, scaler: AmountScaler) -> Self {
        self.scaler = scaler;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn default_network(&self) -> &NetworkName {
        &self.default_network
    }

    /// Fresh unfiltered catalog for `network`
    pub async fn fetch(&self, network: &NetworkName) -> Result<TokenCatalog, TokenDataError> {
        let query = TokenQuery::for_network(network.clone());
        Ok(self.catalog.fetch_catalog(&query).await?)
    }

    /// Catalog fetch with a caller-built query
    pub async fn search(&self, query: &TokenQuery) -> Result<TokenCatalog, TokenDataError> {
        Ok(self.catalog.fetch_catalog(query).await?)
    }

    pub async fn token(&self, network: &NetworkName, index: usize) -> Result<TokenRecord, TokenDataError> {
        Ok(self.catalog.token_at(network, index).await?)
    }

    pub async fn token_address(&self, network: &NetworkName, index: usize) -> Result<String, TokenDataError> {
        Ok(self.token(network, index).await?.address)
    }

    /// Address on the default network
    pub async fn default_token_address(&self, index: usize) -> Result<String, TokenDataError> {
        self.token_address(&self.default_network, index).await
    }

    pub async fn sell_amount(
        &self,
        network: &NetworkName,
        index: usize,
        amount: &BigDecimal,
    ) -> Result<ScaledAmount, TokenDataError> {
        Ok(self.resolve(network, index, amount).await?.sell_amount)
    }

    /// Sell amount on the default network
    pub async fn default_sell_amount(&self, index: usize, amount: &BigDecimal) -> Result<ScaledAmount, TokenDataError> {
        self.sell_amount(&self.default_network, index, amount).await
    }

    /// Token and scaled amount from a single fetch
    pub async fn resolve(
        &self,
        network: &NetworkName,
        index: usize,
        amount: &BigDecimal,
    ) -> Result<ResolvedToken, TokenDataError> {
        let record = self.token(network, index).await?;
        let sell_amount = self.scaler.scale(&record, amount)?;

        tracing::debug!(
            network = %network,
            index,
            address = %record.address,
            decimals = record.decimals,
            sell_amount = %sell_amount,
            "resolved scenario token"
        );

        Ok(ResolvedToken { record, sell_amount })
    }

    /// Source and destination tokens. One fetch when both sit on the same network.
    pub async fn pair(
        &self,
        from_network: &NetworkName,
        from_index: usize,
        to_network: &NetworkName,
        to_index: usize,
    ) -> Result<TokenPair, TokenDataError> {
        if from_network == to_network {
            let catalog = self.fetch(from_network).await?;
            return Ok(TokenPair {
                from: catalog.token_at(from_index)?,
                to: catalog.token_at(to_index)?,
            });
        }

        let from = self.token(from_network, from_index).await?;
        let to = self.token(to_network, to_index).await?;
        Ok(TokenPair { from, to })
    }

    /// Build a `/quote` request from a scenario
    pub async fn quote_request(&self, scenario: &QuoteScenario) -> Result<QuoteRequest, TokenDataError> {
        let pair = self
            .pair(&scenario.network, scenario.from_index, &scenario.network, scenario.to_index)
            .await?;
        let sell_amount = self.render_amount(&pair.from, &scenario.amount)?;

        Ok(QuoteRequest::new(
            scenario.network.clone(),
            pair.from.address,
            pair.to.address,
            sell_amount,
        )
        .with_slippage(scenario.slippage)
        .with_gasless(scenario.gasless))
    }

    /// Build a `/quote-in` request from a scenario
    pub async fn quote_in_request(&self, scenario: &QuoteInScenario) -> Result<QuoteInRequest, TokenDataError> {
        let pair = self
            .pair(
                &scenario.from_network,
                scenario.from_index,
                &scenario.to_network,
                scenario.to_index,
            )
            .await?;
        let sell_amount = self.render_amount(&pair.from, &scenario.amount)?;

        Ok(QuoteInRequest::new(
            scenario.from_network.clone(),
            scenario.to_network.clone(),
            pair.from.address,
            pair.to.address,
            sell_amount,
        )
        .with_slippage(scenario.slippage_in, scenario.slippage_out)
        .with_gasless(scenario.gasless)
        .with_bridge_types(vec![scenario.bridge_type]))
    }

    fn render_amount(&self, record: &TokenRecord, amount: &ScenarioAmount) -> Result<String, TokenDataError> {
        match amount {
            ScenarioAmount::Display(amount) => Ok(self.scaler.scale(record, amount)?.into_string()),
            ScenarioAmount::Raw(amount) => Ok(to_plain_string(amount)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::parse_amount;
    use crate::ports::catalog::MockTokenCatalogPort;
    use crate::ports::mocks::StaticCatalog;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};

    fn bsc_tokens() -> Vec<Value> {
        vec![
            json!({"address": "0x0000000000000000000000000000000000000000", "decimals": 18, "symbol": "BNB"}),
            json!({"address": "0x55d398326f99059ff775485246999027b3197955", "decimals": 18, "symbol": "USDT"}),
            json!({"address": "0xcc42724c6683b7e57334c4e856f4c9965ed682bd", "decimals": 6, "symbol": "MATIC6"}),
            json!({"address": "0xbroken", "decimals": -2, "symbol": "BROKEN"}),
        ]
    }

    fn ethereum_tokens() -> Vec<Value> {
        vec![json!({"address": "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee", "decimals": 18, "symbol": "ETH"})]
    }

    fn provider() -> TokenDataProvider<StaticCatalog> {
        TokenDataProvider::new(
            StaticCatalog::new()
                .with_network("bsc", bsc_tokens())
                .with_network("ethereum", ethereum_tokens()),
        )
    }

    fn dec_amount(raw: &str) -> BigDecimal {
        parse_amount(raw).unwrap()
    }

    #[tokio::test]
    async fn test_bsc_first_token_one_and_a_half() {
        let provider = provider();
        let bsc = NetworkName::from("bsc");

        let resolved = provider.resolve(&bsc, 0, &dec_amount("1.5")).await.unwrap();
        assert_eq!(resolved.record.address, "0x0000000000000000000000000000000000000000");
        assert_eq!(resolved.sell_amount.as_str(), "1500000000000000000");

        // one fetch for address and decimals together
        assert_eq!(provider.catalog().get_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_sell_amount_zero() {
        let provider = provider();
        let amount = provider
            .sell_amount(&"bsc".into(), 2, &dec_amount("0"))
            .await
            .unwrap();
        assert_eq!(amount.as_str(), "0");
    }

    #[tokio::test]
    async fn test_default_network_is_bsc() {
        let provider = provider();
        assert_eq!(provider.default_network().as_str(), "bsc");

        let address = provider.default_token_address(1).await.unwrap();
        assert_eq!(address, "0x55d398326f99059ff775485246999027b3197955");

        let amount = provider.default_sell_amount(2, &dec_amount("2.5")).await.unwrap();
        assert_eq!(amount.as_str(), "2500000");
    }

    #[tokio::test]
    async fn test_custom_default_network() {
        let provider = provider().with_default_network("ethereum");
        let address = provider.default_token_address(0).await.unwrap();
        assert_eq!(address, "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_an_error() {
        let err = provider()
            .token_address(&"ethereum".into(), 50)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TokenDataError::Catalog(CatalogError::IndexOutOfRange { index: 50, len: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_negative_decimals_surface_as_invalid_metadata() {
        let err = provider()
            .sell_amount(&"bsc".into(), 3, &dec_amount("1"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TokenDataError::Scale(ScaleError::InvalidTokenMetadata { decimals: -2, .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_network_surfaces_catalog_error() {
        let err = provider().token(&"solana".into(), 0).await.unwrap_err();
        assert!(matches!(
            err,
            TokenDataError::Catalog(CatalogError::CatalogUnavailable { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_quote_request_uses_single_fetch() {
        let provider = provider();
        let scenario = QuoteScenario::new("bsc", 1, 2, dec_amount("1"))
            .with_slippage(dec!(0.05));

        let request = provider.quote_request(&scenario).await.unwrap();

        assert_eq!(request.network.as_str(), "bsc");
        assert_eq!(request.from_token_address, "0x55d398326f99059ff775485246999027b3197955");
        assert_eq!(request.to_token_address, "0xcc42724c6683b7e57334c4e856f4c9965ed682bd");
        assert_eq!(request.sell_amount, "1000000000000000000");
        assert_eq!(request.slippage, dec!(0.05));
        assert!(!request.gasless);
        assert_eq!(provider.catalog().get_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_quote_in_request_cross_network() {
        let provider = provider();
        let scenario = QuoteInScenario::new("bsc", "ethereum", 0, 0, dec_amount("1"))
            .with_slippage(dec!(0.5), dec!(0.05))
            .with_bridge_type(1);

        let request = provider.quote_in_request(&scenario).await.unwrap();

        assert_eq!(request.from_network.as_str(), "bsc");
        assert_eq!(request.to_network.as_str(), "ethereum");
        assert_eq!(request.to_token_address, "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");
        assert_eq!(request.sell_amount, "1000000000000000000");
        assert_eq!(request.bridge_types, vec![1]);

        let networks: Vec<String> = provider
            .catalog()
            .get_calls()
            .iter()
            .map(TokenQuery::network_label)
            .collect();
        assert_eq!(networks, vec!["bsc".to_string(), "ethereum".to_string()]);
    }

    #[tokio::test]
    async fn test_quote_in_raw_max_amount_is_not_scaled() {
        let scenario = QuoteInScenario::raw("bsc", "ethereum", 0, 0, dec_amount("1e35")).with_gasless(true);

        let request = provider().quote_in_request(&scenario).await.unwrap();
        assert_eq!(request.sell_amount, format!("1{}", "0".repeat(35)));
        assert!(request.gasless);
    }

    #[tokio::test]
    async fn test_raw_zero_quote_sends_plain_zero() {
        let scenario = QuoteScenario::raw("bsc", 1, 2, dec_amount("0")).with_slippage(dec!(0.05));
        assert_eq!(scenario.amount, ScenarioAmount::Raw(dec_amount("0")));

        let request = provider().quote_request(&scenario).await.unwrap();
        assert_eq!(request.sell_amount, "0");
        assert_eq!(request.slippage, dec!(0.05));
    }

    #[tokio::test]
    async fn test_catalog_failure_propagates_from_mock_port() {
        let mut catalog = MockTokenCatalogPort::new();
        catalog
            .expect_token_at()
            .withf(|network, index| network.as_str() == "bsc" && *index == 0)
            .times(1)
            .returning(|network, _| {
                Err(CatalogError::CatalogUnavailable {
                    network: network.to_string(),
                    status: 503,
                })
            });

        let provider = TokenDataProvider::new(catalog);
        let err = provider.token_address(&"bsc".into(), 0).await.unwrap_err();

        assert!(matches!(
            err,
            TokenDataError::Catalog(CatalogError::CatalogUnavailable { status: 503, .. })
        ));
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_pair_same_network_fetches_once_through_mock_port() {
        let mut catalog = MockTokenCatalogPort::new();
        catalog
            .expect_fetch_catalog()
            .withf(|query| query.network_label() == "bsc" && query.search_value.is_empty())
            .times(1)
            .returning(|query| Ok(TokenCatalog::new(query.network_label(), bsc_tokens())));

        let provider = TokenDataProvider::new(catalog);
        let bsc = NetworkName::from("bsc");
        let pair = provider.pair(&bsc, 0, &bsc, 1).await.unwrap();

        assert_eq!(pair.from.symbol.as_deref(), Some("BNB"));
        assert_eq!(pair.to.symbol.as_deref(), Some("USDT"));
    }
}
