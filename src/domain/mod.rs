//! Domain Layer - Core types for the Magpie contract suite
//!
//! This module contains pure domain types and logic with no network access.
//! All external interactions happen through the ports layer.

pub mod token;
pub mod amount;
pub mod quote;

pub use token::{NetworkName, TokenQuery, TokenRecord, DEFAULT_NETWORK};
pub use amount::{AmountScaler, ScaleError, ScaledAmount, parse_amount, to_plain_string};
pub use quote::{
    ApiErrorBody, ApiResponse, QuoteError, QuoteInRequest, QuoteOutcome, QuoteRequest,
    QuoteResponse, BELOW_MINIMUM_AMOUNT, NO_ROUTE_FOR_AMOUNT,
};
