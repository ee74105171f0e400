use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::OfferPricingError;
use crate::OfferPricingResult;

/// All monetary values. Single implicit currency.
pub type Money = Decimal;

/// Rates expressed as decimals (0.19 = 19%). Never as percentages.
pub type Rate = Decimal;

/// Ordered amount of a product, in the product's unit. May be fractional.
pub type Quantity = Decimal;

/// Fractional digits kept for monetary values
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Fractional digits kept for discount rates (0.1234 = 12.34%)
pub const RATE_DECIMAL_PLACES: u32 = 4;

/// Round to currency precision, half-up, with a fixed scale of two digits.
pub fn round_to_currency(value: Decimal) -> Money {
    let mut rounded =
        value.round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_DECIMAL_PLACES);
    rounded
}

/// Round a rate to four fractional digits, half-up.
pub fn round_rate(value: Decimal) -> Rate {
    let mut rounded =
        value.round_dp_with_strategy(RATE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(RATE_DECIMAL_PLACES);
    rounded
}

fn out_of_range(field: &str) -> OfferPricingError {
    OfferPricingError::InvalidInput {
        field: field.into(),
        reason: "Amount exceeds the representable decimal range".into(),
    }
}

/// `a * b`, or `InvalidInput` on `field` when the product overflows.
pub fn checked_product(a: Decimal, b: Decimal, field: &str) -> OfferPricingResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| out_of_range(field))
}

/// Sum of `values`, or `InvalidInput` on `field` when it overflows.
pub fn checked_sum<I>(values: I, field: &str) -> OfferPricingResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| out_of_range(field))
    })
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_currency_half_up() {
        assert_eq!(round_to_currency(dec!(2.355)), dec!(2.36));
        assert_eq!(round_to_currency(dec!(2.354)), dec!(2.35));
        assert_eq!(round_to_currency(dec!(-2.355)), dec!(-2.36));
    }

    #[test]
    fn test_round_to_currency_fixed_scale() {
        assert_eq!(round_to_currency(dec!(50)).to_string(), "50.00");
        assert_eq!(round_to_currency(dec!(0)).to_string(), "0.00");
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        assert_eq!(checked_product(dec!(2.50), dec!(4), "quantity").unwrap(), dec!(10));
        assert_eq!(checked_sum([dec!(1.25), dec!(2.75)], "total").unwrap(), dec!(4));

        match checked_product(Decimal::MAX, dec!(2), "quantity") {
            Err(OfferPricingError::InvalidInput { field, .. }) => assert_eq!(field, "quantity"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        assert!(checked_sum([Decimal::MAX, Decimal::ONE], "total").is_err());
    }

    #[test]
    fn test_round_rate_four_digits() {
        assert_eq!(round_rate(dec!(0.123456)), dec!(0.1235));
        assert_eq!(round_rate(dec!(1)).to_string(), "1.0000");
    }
}
