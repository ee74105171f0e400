use clap::Args;
use serde_json::Value;

use offer_pricing_core::pricing::{self, OfferInput};

use crate::input;

/// Arguments for pricing a complete offer
#[derive(Args)]
pub struct PriceOfferArgs {
    /// Path to JSON or YAML offer file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_price_offer(args: PriceOfferArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let offer_input: OfferInput = input::read_document(args.input.as_deref(), "offer pricing")?;
    let result = pricing::price_offer(&offer_input)?;
    Ok(serde_json::to_value(result)?)
}
