//! Amount Scaling
//!
//! Converts human-scale token amounts into minor units using the token's
//! declared decimals. All arithmetic is arbitrary precision: the quote
//! endpoints are probed with amounts far beyond what `u128` or
//! `rust_decimal::Decimal` can hold.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use thiserror::Error;

use super::token::TokenRecord;

/// Largest decimals value accepted from the catalog
pub const MAX_TOKEN_DECIMALS: i64 = 255;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScaleError {
    #[error("Invalid token metadata for {address}: decimals {decimals} outside 0..={max}")]
    InvalidTokenMetadata {
        address: String,
        decimals: i64,
        max: i64,
    },

    #[error("Amount must not be negative, got {0}")]
    NegativeAmount(String),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),
}

/// Amount expressed in a token's minor units, in plain decimal notation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScaledAmount(String);

impl ScaledAmount {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Parse back into a decimal (always succeeds for scaler output)
    pub fn to_decimal(&self) -> Result<BigDecimal, ScaleError> {
        parse_amount(&self.0)
    }
}

impl fmt::Display for ScaledAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ScaledAmount {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Scales display amounts into minor units for a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountScaler {
    max_decimals: i64,
}

impl Default for AmountScaler {
    fn default() -> Self {
        Self {
            max_decimals: MAX_TOKEN_DECIMALS,
        }
    }
}

impl AmountScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// `amount × 10^record.decimals`, trailing zeros stripped, no exponent
    pub fn scale(&self, record: &TokenRecord, amount: &BigDecimal) -> Result<ScaledAmount, ScaleError> {
        if record.decimals < 0 || record.decimals > self.max_decimals {
            return Err(ScaleError::InvalidTokenMetadata {
                address: record.address.clone(),
                decimals: record.decimals,
                max: self.max_decimals,
            });
        }

        if amount.sign() == Sign::Minus {
            return Err(ScaleError::NegativeAmount(to_plain_string(amount)));
        }

        let factor = BigDecimal::new(BigInt::from(1), -record.decimals);
        let scaled = amount * &factor;

        Ok(ScaledAmount(to_plain_string(&scaled)))
    }

    /// Parse `amount` and scale it in one step
    pub fn scale_str(&self, record: &TokenRecord, amount: &str) -> Result<ScaledAmount, ScaleError> {
        let amount = parse_amount(amount)?;
        self.scale(record, &amount)
    }
}

/// Largest power-of-ten exponent accepted in an amount, either direction
pub const MAX_AMOUNT_EXPONENT: i64 = 10_000;

/// Parse a decimal amount from text. Accepts plain and exponent notation.
pub fn parse_amount(raw: &str) -> Result<BigDecimal, ScaleError> {
    let value = BigDecimal::from_str(raw.trim()).map_err(|_| ScaleError::InvalidAmount(raw.to_string()))?;

    // Plain rendering is linear in the exponent
    let (_, exponent) = value.normalized().as_bigint_and_exponent();
    if exponent.abs() > MAX_AMOUNT_EXPONENT {
        return Err(ScaleError::InvalidAmount(raw.to_string()));
    }

    Ok(value)
}

/// Canonical plain rendering: no exponent marker, no trailing fractional
/// zeros, no trailing decimal point, and zero as "0".
pub fn to_plain_string(value: &BigDecimal) -> String {
    value.normalized().to_plain_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(decimals: i64) -> TokenRecord {
        TokenRecord::new("0x55d398326f99059ff775485246999027b3197955", decimals)
    }

    fn dec(raw: &str) -> BigDecimal {
        parse_amount(raw).unwrap()
    }

    #[test]
    fn test_scale_one_and_a_half_at_18_decimals() {
        let scaled = AmountScaler::new().scale(&token(18), &dec("1.5")).unwrap();
        assert_eq!(scaled.as_str(), "1500000000000000000");
    }

    #[test]
    fn test_scale_zero_is_zero_for_any_decimals() {
        let scaler = AmountScaler::new();
        for decimals in [0, 1, 6, 8, 9, 18, 24, 255] {
            let scaled = scaler.scale(&token(decimals), &dec("0")).unwrap();
            assert_eq!(scaled.as_str(), "0", "decimals = {}", decimals);

            let scaled = scaler.scale(&token(decimals), &dec("0.000")).unwrap();
            assert_eq!(scaled.as_str(), "0", "decimals = {}", decimals);
        }
    }

    #[test]
    fn test_scale_max_probe_amount_is_exact() {
        let amount = dec("100000000000000000000000000000000000"); // 10^35
        let scaled = AmountScaler::new().scale(&token(18), &amount).unwrap();

        let expected = format!("1{}", "0".repeat(53));
        assert_eq!(scaled.as_str(), expected);
        assert!(!scaled.as_str().contains(['e', 'E']));
    }

    #[test]
    fn test_scale_exponent_input_renders_plain() {
        let scaled = AmountScaler::new().scale(&token(18), &dec("1e35")).unwrap();
        assert_eq!(scaled.as_str(), format!("1{}", "0".repeat(53)));
    }

    #[test]
    fn test_scale_keeps_sub_unit_remainder() {
        // 6 decimals cannot represent 0.0000001 as a whole number of minor units
        let scaled = AmountScaler::new().scale(&token(6), &dec("0.0000001")).unwrap();
        assert_eq!(scaled.as_str(), "0.1");
    }

    #[test]
    fn test_scale_strips_trailing_fractional_zeros() {
        let scaled = AmountScaler::new().scale(&token(2), &dec("1.2345000")).unwrap();
        assert_eq!(scaled.as_str(), "123.45");
    }

    #[test]
    fn test_scale_zero_decimals() {
        let scaled = AmountScaler::new().scale(&token(0), &dec("42")).unwrap();
        assert_eq!(scaled.as_str(), "42");
    }

    #[test]
    fn test_scale_does_not_suffer_float_representation_error() {
        // 0.1 + 0.2 style values are exact here
        let scaled = AmountScaler::new().scale(&token(18), &dec("0.3")).unwrap();
        assert_eq!(scaled.as_str(), "300000000000000000");

        let scaled = AmountScaler::new().scale(&token(24), &dec("1.000000000000000000000001")).unwrap();
        assert_eq!(scaled.as_str(), "1000000000000000000000001");
    }

    #[test]
    fn test_scale_round_trips_exactly() {
        let scaler = AmountScaler::new();
        let amounts = ["0", "1", "1.5", "0.05", "123456789.987654321", "1e35", "0.000000000000000001"];

        for decimals in [0, 6, 9, 18, 30] {
            for raw in amounts {
                let amount = dec(raw);
                let scaled = scaler.scale(&token(decimals), &amount).unwrap();

                let expected = &amount * &BigDecimal::new(BigInt::from(1), -decimals);
                assert_eq!(
                    scaled.to_decimal().unwrap(),
                    expected,
                    "amount {} at {} decimals rendered as {}",
                    raw,
                    decimals,
                    scaled
                );

                let text = scaled.as_str();
                assert!(!text.contains(['e', 'E']), "exponent marker in {}", text);
                if text.contains('.') {
                    assert!(!text.ends_with('0'), "trailing zero in {}", text);
                    assert!(!text.ends_with('.'), "trailing point in {}", text);
                }
            }
        }
    }

    #[test]
    fn test_negative_decimals_rejected() {
        let err = AmountScaler::new().scale(&token(-1), &dec("1")).unwrap_err();
        assert!(matches!(err, ScaleError::InvalidTokenMetadata { decimals: -1, .. }));
    }

    #[test]
    fn test_absurd_decimals_rejected() {
        let err = AmountScaler::new().scale(&token(10_000), &dec("1")).unwrap_err();
        assert!(matches!(err, ScaleError::InvalidTokenMetadata { decimals: 10_000, .. }));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = AmountScaler::new().scale(&token(18), &dec("-1.5")).unwrap_err();
        assert_eq!(err, ScaleError::NegativeAmount("-1.5".to_string()));
    }

    #[test]
    fn test_scale_str_rejects_garbage() {
        let err = AmountScaler::new().scale_str(&token(18), "one").unwrap_err();
        assert_eq!(err, ScaleError::InvalidAmount("one".to_string()));
    }

    #[test]
    fn test_huge_exponents_rejected() {
        for raw in ["1e1000000000", "1E-1000000000", "5e10001"] {
            assert_eq!(parse_amount(raw).unwrap_err(), ScaleError::InvalidAmount(raw.to_string()));
        }

        let err = AmountScaler::new().scale_str(&token(18), "1e1000000000").unwrap_err();
        assert!(matches!(err, ScaleError::InvalidAmount(_)));

        // Trailing zeros do not count against the bound
        assert!(parse_amount("1e10000").is_ok());
        assert!(parse_amount("1.000000e-9999").is_ok());
    }

    #[test]
    fn test_plain_string_small_fraction() {
        assert_eq!(to_plain_string(&dec("0.00012300")), "0.000123");
        assert_eq!(to_plain_string(&dec("-2.50")), "-2.5");
        assert_eq!(to_plain_string(&dec("1200")), "1200");
    }
}
