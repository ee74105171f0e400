use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::OfferPricingError;
use crate::types::{round_rate, Quantity, Rate};
use crate::OfferPricingResult;

/// Standard quantity discount table: (largest quantity in the tier, rate).
/// Quantities above the last bound take the last rate.
const STANDARD_TIERS: [(u32, Rate); 55] = [
    (1, dec!(0.00)),
    (2, dec!(0.02)),
    (3, dec!(0.05)),
    (4, dec!(0.11)),
    (5, dec!(0.16)),
    (6, dec!(0.21)),
    (7, dec!(0.24)),
    (8, dec!(0.28)),
    (9, dec!(0.31)),
    (10, dec!(0.33)),
    (11, dec!(0.36)),
    (12, dec!(0.38)),
    (13, dec!(0.40)),
    (14, dec!(0.41)),
    (15, dec!(0.43)),
    (16, dec!(0.44)),
    (17, dec!(0.45)),
    (18, dec!(0.46)),
    (19, dec!(0.47)),
    (20, dec!(0.48)),
    (21, dec!(0.49)),
    (22, dec!(0.50)),
    (24, dec!(0.51)),
    (25, dec!(0.52)),
    (27, dec!(0.53)),
    (28, dec!(0.54)),
    (30, dec!(0.55)),
    (32, dec!(0.56)),
    (35, dec!(0.57)),
    (37, dec!(0.58)),
    (40, dec!(0.59)),
    (43, dec!(0.60)),
    (46, dec!(0.61)),
    (50, dec!(0.62)),
    (55, dec!(0.63)),
    (59, dec!(0.64)),
    (65, dec!(0.65)),
    (72, dec!(0.66)),
    (79, dec!(0.67)),
    (88, dec!(0.68)),
    (98, dec!(0.69)),
    (111, dec!(0.70)),
    (125, dec!(0.71)),
    (143, dec!(0.72)),
    (164, dec!(0.73)),
    (191, dec!(0.74)),
    (225, dec!(0.75)),
    (267, dec!(0.76)),
    (323, dec!(0.77)),
    (398, dec!(0.78)),
    (496, dec!(0.79)),
    (643, dec!(0.80)),
    (840, dec!(0.81)),
    (1000, dec!(0.82)),
    (u32::MAX, dec!(0.82)),
];

/// One step of the schedule: every whole quantity up to and including
/// `upper_bound` (and above the previous tier's bound) gets `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub upper_bound: u32,
    pub rate: Rate,
}

/// Monotonic step function from ordered quantity to discount rate.
///
/// The schedule knows nothing about product categories; callers decide
/// which products it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountSchedule {
    tiers: Vec<DiscountTier>,
}

impl DiscountSchedule {
    /// The schedule used for bioinformatics services: 0% for one unit,
    /// rising to a plateau of 82% above 1000 units.
    pub fn standard() -> Self {
        Self {
            tiers: STANDARD_TIERS
                .iter()
                .map(|&(upper_bound, rate)| DiscountTier { upper_bound, rate })
                .collect(),
        }
    }

    /// Build a schedule from hand-maintained tiers, rejecting tables that
    /// would break the rate contract.
    pub fn new(tiers: Vec<DiscountTier>) -> OfferPricingResult<Self> {
        if tiers.is_empty() {
            return Err(OfferPricingError::InvalidInput {
                field: "tiers".into(),
                reason: "A discount schedule needs at least one tier".into(),
            });
        }

        for (i, tier) in tiers.iter().enumerate() {
            if tier.rate < Decimal::ZERO || tier.rate > Decimal::ONE {
                return Err(OfferPricingError::InvalidRatio {
                    name: format!("discount tier {} rate", i + 1),
                    value: tier.rate,
                });
            }
            if i == 0 {
                continue;
            }
            let previous = &tiers[i - 1];
            if tier.upper_bound <= previous.upper_bound {
                return Err(OfferPricingError::InvalidInput {
                    field: "tiers".into(),
                    reason: format!(
                        "Tier {} bound {} does not exceed previous bound {}",
                        i + 1,
                        tier.upper_bound,
                        previous.upper_bound
                    ),
                });
            }
            if tier.rate < previous.rate {
                return Err(OfferPricingError::InvalidInput {
                    field: "tiers".into(),
                    reason: format!(
                        "Tier {} rate {} is lower than previous rate {}",
                        i + 1,
                        tier.rate,
                        previous.rate
                    ),
                });
            }
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[DiscountTier] {
        &self.tiers
    }

    /// The rate beyond the last bound.
    pub fn plateau(&self) -> Rate {
        self.tiers.last().map(|t| t.rate).unwrap_or_default()
    }

    /// Discount rate for `quantity`, floored to a whole number first.
    /// Rounded to four fractional digits.
    pub fn rate(&self, quantity: Quantity) -> OfferPricingResult<Rate> {
        if quantity < Decimal::ZERO {
            return Err(OfferPricingError::InvalidQuantity { quantity });
        }

        let whole = quantity.floor();
        let rate = self
            .tiers
            .iter()
            .find(|t| Decimal::from(t.upper_bound) >= whole)
            .map(|t| t.rate)
            .unwrap_or_else(|| self.plateau());

        Ok(round_rate(rate))
    }
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        Self::standard()
    }
}
