use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use offer_pricing_core::discount::DiscountSchedule;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn price_offer(input_json: String) -> NapiResult<String> {
    let input: offer_pricing_core::pricing::OfferInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = offer_pricing_core::pricing::price_offer(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn price_line_item(input_json: String) -> NapiResult<String> {
    let input: offer_pricing_core::pricing::LineItemInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        offer_pricing_core::pricing::price_line_item_report(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Discounts and tax
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DiscountRate {
    quantity: Decimal,
    discount_rate: Decimal,
}

/// Quantity is passed as a decimal string to keep full precision.
#[napi]
pub fn discount_rate(quantity: String) -> NapiResult<String> {
    let quantity = Decimal::from_str(quantity.trim()).map_err(to_napi_error)?;
    let discount_rate = DiscountSchedule::standard()
        .rate(quantity)
        .map_err(to_napi_error)?;
    serde_json::to_string(&DiscountRate {
        quantity,
        discount_rate,
    })
    .map_err(to_napi_error)
}

#[napi]
pub fn tax_report(input_json: String) -> NapiResult<String> {
    let input: offer_pricing_core::tax::TaxReportInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = offer_pricing_core::tax::calculate_tax_report(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
