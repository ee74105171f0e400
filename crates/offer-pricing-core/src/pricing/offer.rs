use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::catalog::{Affiliation, ProductSnapshot};
use crate::discount::DiscountSchedule;
use crate::error::OfferPricingError;
use crate::pricing::grouping::{group_line_items, GroupTotals, GroupedItems};
use crate::pricing::line_item::{price_line_item, LineItem};
use crate::pricing::overhead::overheads_for;
use crate::tax::TaxPolicy;
use crate::types::{
    checked_sum, round_to_currency, with_metadata, ComputationOutput, Money, Quantity, Rate,
};
use crate::OfferPricingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInformation {
    pub title: String,
    pub objective: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental_design: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferItemInput {
    pub product: ProductSnapshot,
    pub quantity: Quantity,
}

/// Everything the catalog and customer records supply for one offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferInput {
    pub customer: Person,
    pub project_manager: Person,
    /// The customer affiliation selected for pricing
    pub affiliation: Affiliation,
    pub project: ProjectInformation,
    pub items: Vec<OfferItemInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
}

/// Last pipeline stage an offer has been through. Stages run strictly in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PricingStage {
    Draft,
    Grouped,
    NetPriced,
    Taxed,
    OverheadApplied,
    DiscountTotalled,
    Priced,
}

impl std::fmt::Display for PricingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PricingStage::Draft => "draft",
            PricingStage::Grouped => "grouped",
            PricingStage::NetPriced => "net priced",
            PricingStage::Taxed => "taxed",
            PricingStage::OverheadApplied => "overhead applied",
            PricingStage::DiscountTotalled => "discount totalled",
            PricingStage::Priced => "priced",
        };
        f.write_str(name)
    }
}

/// A price quotation. Values are never changed in place: every stage
/// returns a new offer, so a snapshot can be shared freely while the next
/// one is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    customer: Person,
    project_manager: Person,
    affiliation: Affiliation,
    project: ProjectInformation,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    valid_until: Option<NaiveDate>,
    items: Vec<LineItem>,
    groups: GroupedItems,
    net_sums: GroupTotals,
    total_net_price: Money,
    vat_ratio: Rate,
    total_vat: Money,
    overhead_ratio: Rate,
    overheads: GroupTotals,
    total_overhead: Money,
    total_discount_amount: Money,
    total_cost: Money,
    stage: PricingStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<String>,
}

impl Offer {
    /// Price every item for the selected affiliation and return an offer in
    /// the draft stage. Negative quantities are rejected here, before any
    /// offer exists.
    pub fn draft(input: &OfferInput, schedule: &DiscountSchedule) -> OfferPricingResult<Offer> {
        let category = input.affiliation.category;
        let items = input
            .items
            .iter()
            .map(|i| price_line_item(category, &i.product, i.quantity, schedule))
            .collect::<OfferPricingResult<Vec<LineItem>>>()?;

        let mut offer = Offer {
            customer: input.customer.clone(),
            project_manager: input.project_manager.clone(),
            affiliation: input.affiliation.clone(),
            project: input.project.clone(),
            created_on: input.created_on,
            valid_until: input.valid_until,
            items,
            groups: GroupedItems::default(),
            net_sums: GroupTotals::default(),
            total_net_price: Decimal::ZERO,
            vat_ratio: Decimal::ZERO,
            total_vat: Decimal::ZERO,
            overhead_ratio: Decimal::ZERO,
            overheads: GroupTotals::default(),
            total_overhead: Decimal::ZERO,
            total_discount_amount: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            stage: PricingStage::Draft,
            checksum: None,
        };
        offer.checksum = checksum_of(&offer);
        Ok(offer)
    }

    /// A new draft with item `index` re-priced for `quantity`. The product
    /// snapshot of the item is kept as is.
    pub fn with_item_quantity(
        &self,
        index: usize,
        quantity: Quantity,
        schedule: &DiscountSchedule,
    ) -> OfferPricingResult<Offer> {
        let current = self.items.get(index).ok_or_else(|| OfferPricingError::InvalidInput {
            field: "index".into(),
            reason: format!("Offer has {} items, no item at index {index}", self.items.len()),
        })?;
        let repriced = current.with_quantity(quantity, schedule)?;

        let mut items = self.items.clone();
        items[index] = repriced;

        let mut offer = Offer {
            items,
            groups: GroupedItems::default(),
            net_sums: GroupTotals::default(),
            total_net_price: Decimal::ZERO,
            vat_ratio: Decimal::ZERO,
            total_vat: Decimal::ZERO,
            overhead_ratio: Decimal::ZERO,
            overheads: GroupTotals::default(),
            total_overhead: Decimal::ZERO,
            total_discount_amount: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            stage: PricingStage::Draft,
            checksum: None,
            ..self.clone()
        };
        offer.checksum = checksum_of(&offer);
        Ok(offer)
    }

    pub fn customer(&self) -> &Person {
        &self.customer
    }

    pub fn project_manager(&self) -> &Person {
        &self.project_manager
    }

    pub fn affiliation(&self) -> &Affiliation {
        &self.affiliation
    }

    pub fn project(&self) -> &ProjectInformation {
        &self.project
    }

    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_on
    }

    pub fn valid_until(&self) -> Option<NaiveDate> {
        self.valid_until
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn groups(&self) -> &GroupedItems {
        &self.groups
    }

    pub fn net_sums(&self) -> &GroupTotals {
        &self.net_sums
    }

    pub fn total_net_price(&self) -> Money {
        self.total_net_price
    }

    pub fn vat_ratio(&self) -> Rate {
        self.vat_ratio
    }

    pub fn total_vat(&self) -> Money {
        self.total_vat
    }

    pub fn overhead_ratio(&self) -> Rate {
        self.overhead_ratio
    }

    pub fn overheads(&self) -> &GroupTotals {
        &self.overheads
    }

    pub fn total_overhead(&self) -> Money {
        self.total_overhead
    }

    pub fn total_discount_amount(&self) -> Money {
        self.total_discount_amount
    }

    pub fn total_cost(&self) -> Money {
        self.total_cost
    }

    pub fn stage(&self) -> PricingStage {
        self.stage
    }

    /// SHA-256 over the offer's identifying fields, hex encoded. `None` when
    /// built without the `checksum` feature.
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }
}

#[cfg(feature = "checksum")]
fn checksum_of(offer: &Offer) -> Option<String> {
    Some(crate::checksum::offer_checksum(offer))
}

#[cfg(not(feature = "checksum"))]
fn checksum_of(_offer: &Offer) -> Option<String> {
    None
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

/// Copy `offer` into the stage after `expected`, or refuse if it is not
/// there yet (or already past it).
fn advance(offer: &Offer, stage: &str, expected: PricingStage, next: PricingStage) -> OfferPricingResult<Offer> {
    if offer.stage != expected {
        return Err(OfferPricingError::StageOrder {
            stage: stage.into(),
            expected: expected.to_string(),
            found: offer.stage.to_string(),
        });
    }
    Ok(Offer {
        stage: next,
        ..offer.clone()
    })
}

/// Partition the line items into billing groups. Aborts on unknown
/// category labels.
pub fn group_by_category(offer: &Offer) -> OfferPricingResult<Offer> {
    let mut next = advance(offer, "group_by_category", PricingStage::Draft, PricingStage::Grouped)?;
    next.groups = group_line_items(&offer.items)?;
    debug!(items = next.groups.len(), "grouped line items");
    Ok(next)
}

pub fn compute_net_prices(offer: &Offer) -> OfferPricingResult<Offer> {
    let mut next = advance(offer, "compute_net_prices", PricingStage::Grouped, PricingStage::NetPriced)?;
    next.net_sums = offer.groups.totals(|items| {
        let net = checked_sum(items.iter().map(|i| i.sale_price()), "net_price")?;
        Ok(round_to_currency(net))
    })?;
    next.total_net_price = round_to_currency(next.net_sums.total()?);
    debug!(total_net_price = %next.total_net_price, "computed net prices");
    Ok(next)
}

/// VAT on the total net price under the affiliation's tax policy.
pub fn compute_vat(offer: &Offer) -> OfferPricingResult<Offer> {
    let mut next = advance(offer, "compute_vat", PricingStage::NetPriced, PricingStage::Taxed)?;
    let policy = TaxPolicy::for_affiliation(offer.affiliation.category, &offer.affiliation.country)?;
    next.vat_ratio = policy.vat_ratio();
    next.total_vat = round_to_currency(policy.calculate_taxes(offer.total_net_price));
    debug!(policy = policy.name(), total_vat = %next.total_vat, "computed VAT");
    Ok(next)
}

pub fn compute_overheads(offer: &Offer) -> OfferPricingResult<Offer> {
    let mut next = advance(offer, "compute_overheads", PricingStage::Taxed, PricingStage::OverheadApplied)?;
    let breakdown = overheads_for(&offer.groups, offer.affiliation.category)?;
    next.overhead_ratio = breakdown.ratio;
    next.overheads = breakdown.per_group;
    next.total_overhead = breakdown.total;
    debug!(ratio = %breakdown.ratio, total_overhead = %breakdown.total, "computed overheads");
    Ok(next)
}

/// Informational only; discounts are already netted into sale prices.
pub fn compute_total_discount(offer: &Offer) -> OfferPricingResult<Offer> {
    let mut next = advance(
        offer,
        "compute_total_discount",
        PricingStage::OverheadApplied,
        PricingStage::DiscountTotalled,
    )?;
    let total = checked_sum(
        offer
            .groups
            .iter()
            .flat_map(|(_, items)| items.iter())
            .map(|i| i.discount_amount()),
        "discount_amount",
    )?;
    next.total_discount_amount = round_to_currency(total);
    debug!(total_discount = %next.total_discount_amount, "computed total discount");
    Ok(next)
}

pub fn compute_total_cost(offer: &Offer) -> OfferPricingResult<Offer> {
    let mut next = advance(
        offer,
        "compute_total_cost",
        PricingStage::DiscountTotalled,
        PricingStage::Priced,
    )?;
    next.total_cost = checked_sum(
        [offer.total_net_price, offer.total_overhead, offer.total_vat],
        "total_cost",
    )?;
    debug!(total_cost = %next.total_cost, "computed total cost");
    Ok(next)
}

/// Run every stage, in order, on a draft offer.
pub fn run_pipeline(draft: &Offer) -> OfferPricingResult<Offer> {
    let grouped = group_by_category(draft)?;
    let net = compute_net_prices(&grouped)?;
    let taxed = compute_vat(&net)?;
    let with_overheads = compute_overheads(&taxed)?;
    let discounted = compute_total_discount(&with_overheads)?;
    compute_total_cost(&discounted)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price a complete offer with the standard discount schedule.
pub fn price_offer(input: &OfferInput) -> OfferPricingResult<ComputationOutput<Offer>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.items.is_empty() {
        warnings.push("Offer contains no line items; all totals are zero".to_string());
    }
    for (i, item) in input.items.iter().enumerate() {
        if item.quantity.is_zero() {
            warnings.push(format!(
                "Item {} ({}) has quantity zero",
                i + 1,
                item.product.name
            ));
        }
    }
    if let (Some(created), Some(valid_until)) = (input.created_on, input.valid_until) {
        if valid_until < created {
            warnings.push(format!(
                "Offer is valid until {valid_until}, before its creation date {created}"
            ));
        }
    }

    let draft = Offer::draft(input, &DiscountSchedule::standard())?;
    let offer = run_pipeline(&draft)?;

    let assumptions = serde_json::json!({
        "affiliation_category": input.affiliation.category,
        "country": input.affiliation.country,
        "num_items": input.items.len(),
        "overhead_ratio": offer.overhead_ratio.to_string(),
        "vat_ratio": offer.vat_ratio.to_string(),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Offer pricing: group by category, net sums, VAT on net, overheads rounded per group, total cost",
        &assumptions,
        warnings,
        elapsed,
        offer,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
