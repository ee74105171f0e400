use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use offer_pricing_core::discount::DiscountSchedule;

/// Arguments for a discount schedule lookup
#[derive(Args)]
pub struct DiscountRateArgs {
    /// Ordered quantity (fractions are floored)
    #[arg(long, allow_negative_numbers = true)]
    pub quantity: Decimal,
}

#[derive(Debug, Serialize)]
struct DiscountRateOutput {
    quantity: Decimal,
    discount_rate: Decimal,
    discount_percent: Decimal,
}

pub fn run_discount_rate(args: DiscountRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rate = DiscountSchedule::standard().rate(args.quantity)?;
    let output = DiscountRateOutput {
        quantity: args.quantity,
        discount_rate: rate,
        discount_percent: (rate * Decimal::ONE_HUNDRED).round_dp(2),
    };
    Ok(serde_json::to_value(output)?)
}
