use async_trait::async_trait;

use crate::domain::quote::{ApiResponse, QuoteError, QuoteInRequest, QuoteRequest};

/// Aggregator quoting endpoints
///
/// Implementations return the raw response for any HTTP status; only
/// transport failures are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuotePort: Send + Sync {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<ApiResponse, QuoteError>;

    async fn get_quote_in(&self, request: &QuoteInRequest) -> Result<ApiResponse, QuoteError>;
}
