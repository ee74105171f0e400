use clap::Args;
use serde_json::Value;

use offer_pricing_core::pricing::{self, LineItemInput};

use crate::input;

/// Arguments for pricing a single line item
#[derive(Args)]
pub struct LineItemArgs {
    /// Path to JSON or YAML file with category, product and quantity
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_line_item(args: LineItemArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let item_input: LineItemInput = input::read_document(args.input.as_deref(), "line item pricing")?;
    let result = pricing::price_line_item_report(&item_input)?;
    Ok(serde_json::to_value(result)?)
}
