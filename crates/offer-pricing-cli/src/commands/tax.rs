use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use offer_pricing_core::catalog::AffiliationCategory;
use offer_pricing_core::tax::{self, TaxReportInput};

/// Arguments for a VAT report
#[derive(Args)]
pub struct TaxArgs {
    /// Affiliation category: internal, "external academic" or external
    #[arg(long, value_parser = parse_category)]
    pub category: AffiliationCategory,

    /// Country of the affiliation
    #[arg(long)]
    pub country: String,

    /// Net amount to tax
    #[arg(long, allow_negative_numbers = true)]
    pub net: Decimal,
}

fn parse_category(raw: &str) -> Result<AffiliationCategory, String> {
    let normalized = raw.replace(['-', '_'], " ");
    AffiliationCategory::from_label(&normalized).ok_or_else(|| {
        format!("unknown affiliation category '{raw}' (expected internal, external-academic or external)")
    })
}

pub fn run_tax(args: TaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let report_input = TaxReportInput {
        category: args.category,
        country: args.country,
        net_amount: args.net,
    };
    let result = tax::calculate_tax_report(&report_input)?;
    Ok(serde_json::to_value(result)?)
}
