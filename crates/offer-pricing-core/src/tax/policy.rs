use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use crate::catalog::affiliation::is_germany;
use crate::catalog::AffiliationCategory;
use crate::error::OfferPricingError;
use crate::types::{checked_sum, round_to_currency, with_metadata, ComputationOutput, Money, Rate};
use crate::OfferPricingResult;

const VAT_RATIO_GERMANY: Rate = dec!(0.19);

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// How VAT applies to an offer. Each variant can only be obtained for the
/// affiliation category and country it is valid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxPolicy {
    /// Internal customer in Germany: no VAT
    Internal,
    /// External (academic or not) customer in Germany: German VAT
    ExternalGermanCustomer,
    /// Any customer outside Germany: no VAT
    OutsideGermany,
}

impl TaxPolicy {
    pub fn internal(category: AffiliationCategory, country: &str) -> OfferPricingResult<Self> {
        if category != AffiliationCategory::Internal {
            return Err(violation(format!(
                "Cannot apply internal tax policy to affiliation of type {category}"
            )));
        }
        if !is_germany(country) {
            return Err(violation(format!(
                "Cannot apply internal tax policy to countries outside of Germany: {country}"
            )));
        }
        Ok(TaxPolicy::Internal)
    }

    pub fn external_german_customer(
        category: AffiliationCategory,
        country: &str,
    ) -> OfferPricingResult<Self> {
        if category == AffiliationCategory::Internal {
            return Err(violation(
                "External German customer policy must not be applied to internal customers".into(),
            ));
        }
        if !is_germany(country) {
            return Err(violation(format!(
                "External German customer policy must not be applied outside of Germany: {country}"
            )));
        }
        Ok(TaxPolicy::ExternalGermanCustomer)
    }

    pub fn outside_germany(country: &str) -> OfferPricingResult<Self> {
        if is_germany(country) {
            return Err(violation(
                "Outside Germany policy must be applied to countries outside of Germany only"
                    .into(),
            ));
        }
        Ok(TaxPolicy::OutsideGermany)
    }

    /// Select the policy for an affiliation. Country decides first, then
    /// category. A blank country is refused rather than read as foreign.
    pub fn for_affiliation(category: AffiliationCategory, country: &str) -> OfferPricingResult<Self> {
        if country.trim().is_empty() {
            return Err(OfferPricingError::InvalidInput {
                field: "country".into(),
                reason: "Country is required to select a tax policy".into(),
            });
        }
        if !is_germany(country) {
            return Self::outside_germany(country);
        }
        if category == AffiliationCategory::Internal {
            return Self::internal(category, country);
        }
        Self::external_german_customer(category, country)
    }

    pub fn vat_ratio(&self) -> Rate {
        match self {
            TaxPolicy::ExternalGermanCustomer => VAT_RATIO_GERMANY,
            TaxPolicy::Internal | TaxPolicy::OutsideGermany => Decimal::ZERO,
        }
    }

    /// Tax owed on `value`, unrounded.
    pub fn calculate_taxes(&self, value: Money) -> Money {
        match self {
            TaxPolicy::ExternalGermanCustomer => value * VAT_RATIO_GERMANY,
            TaxPolicy::Internal | TaxPolicy::OutsideGermany => Decimal::ZERO,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaxPolicy::Internal => "internal",
            TaxPolicy::ExternalGermanCustomer => "external German customer",
            TaxPolicy::OutsideGermany => "outside Germany",
        }
    }
}

fn violation(message: String) -> OfferPricingError {
    warn!(%message, "tax policy refused");
    OfferPricingError::PolicyViolation(message)
}

// ---------------------------------------------------------------------------
// Tax report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxReportInput {
    pub category: AffiliationCategory,
    pub country: String,
    pub net_amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxReport {
    pub policy: TaxPolicy,
    pub vat_ratio: Rate,
    pub net_amount: Money,
    pub total_vat: Money,
    pub gross_amount: Money,
}

/// VAT for a net amount under the policy selected for the affiliation.
pub fn calculate_tax_report(input: &TaxReportInput) -> OfferPricingResult<ComputationOutput<TaxReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.net_amount < Decimal::ZERO {
        return Err(OfferPricingError::InvalidInput {
            field: "net_amount".into(),
            reason: "Net amount must not be negative".into(),
        });
    }
    let policy = TaxPolicy::for_affiliation(input.category, &input.country)?;
    if policy == TaxPolicy::OutsideGermany {
        warnings.push(format!(
            "No VAT charged for customers in {}; reverse charge may apply",
            input.country.trim()
        ));
    }

    let net_amount = round_to_currency(input.net_amount);
    let total_vat = round_to_currency(policy.calculate_taxes(net_amount));

    let result = TaxReport {
        policy,
        vat_ratio: policy.vat_ratio(),
        net_amount,
        total_vat,
        gross_amount: checked_sum([net_amount, total_vat], "gross_amount")?,
    };

    let assumptions = serde_json::json!({
        "category": input.category,
        "country": input.country,
        "policy": policy.name(),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Tax policy selection by affiliation country and category, VAT rounded half-up to currency",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}
