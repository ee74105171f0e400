use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::catalog::{AffiliationCategory, ProductCategory, ProductSnapshot};
use crate::discount::DiscountSchedule;
use crate::error::OfferPricingError;
use crate::types::{
    checked_product, round_rate, round_to_currency, with_metadata, ComputationOutput, Money,
    Quantity, Rate,
};
use crate::OfferPricingResult;

const DATA_STORAGE_LABEL: &str = "Data Storage";

/// One product entry on an offer. All derived amounts are computed once,
/// from the snapshot, quantity and affiliation category, when the item is
/// priced; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    product: ProductSnapshot,
    affiliation_category: AffiliationCategory,
    quantity: Quantity,
    unit_price: Money,
    discount_rate: Rate,
    unit_discount_amount: Money,
    list_price: Money,
    discount_amount: Money,
    sale_price: Money,
}

impl LineItem {
    pub fn product(&self) -> &ProductSnapshot {
        &self.product
    }

    pub fn affiliation_category(&self) -> AffiliationCategory {
        self.affiliation_category
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn discount_rate(&self) -> Rate {
        self.discount_rate
    }

    pub fn unit_discount_amount(&self) -> Money {
        self.unit_discount_amount
    }

    /// Unit price times quantity, before discount
    pub fn list_price(&self) -> Money {
        self.list_price
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    /// List price less discount
    pub fn sale_price(&self) -> Money {
        self.sale_price
    }

    pub fn has_discount(&self) -> bool {
        self.discount_rate > Decimal::ZERO
    }

    /// Discount rate as a percentage, 0 to 100.
    pub fn relative_discount(&self) -> Decimal {
        round_to_currency(self.discount_rate * dec!(100))
    }

    /// Re-price the same snapshot for a new quantity.
    pub fn with_quantity(
        &self,
        quantity: Quantity,
        schedule: &DiscountSchedule,
    ) -> OfferPricingResult<LineItem> {
        price_line_item(self.affiliation_category, &self.product, quantity, schedule)
    }

    /// "<name> (<category>)", used in error reports.
    pub fn describe(&self) -> String {
        format!("{} ({})", self.product.name, self.product.category)
    }
}

fn quantity_discount_rate(
    product: &ProductSnapshot,
    quantity: Quantity,
    schedule: &DiscountSchedule,
) -> OfferPricingResult<Rate> {
    match product.product_category() {
        Some(category) if category.is_quantity_discountable() => schedule.rate(quantity),
        _ => Ok(Decimal::ZERO),
    }
}

/// Internal customers store data for free.
fn storage_discount_rate(category: AffiliationCategory, product: &ProductSnapshot) -> Rate {
    let is_storage = product.category.eq_ignore_ascii_case(DATA_STORAGE_LABEL);
    if is_storage && category == AffiliationCategory::Internal {
        Decimal::ONE
    } else {
        Decimal::ZERO
    }
}

fn unit_price_for(category: AffiliationCategory, product: &ProductSnapshot) -> Money {
    match category {
        AffiliationCategory::Internal => product.internal_unit_price,
        AffiliationCategory::ExternalAcademic | AffiliationCategory::External => {
            product.external_unit_price
        }
    }
}

/// Price `quantity` units of `product` for a customer of `category`.
pub fn price_line_item(
    category: AffiliationCategory,
    product: &ProductSnapshot,
    quantity: Quantity,
    schedule: &DiscountSchedule,
) -> OfferPricingResult<LineItem> {
    if quantity < Decimal::ZERO {
        return Err(OfferPricingError::InvalidQuantity { quantity });
    }
    if product.internal_unit_price < Decimal::ZERO {
        return Err(OfferPricingError::InvalidInput {
            field: "internal_unit_price".into(),
            reason: format!("Unit price of '{}' must not be negative", product.name),
        });
    }
    if product.external_unit_price < Decimal::ZERO {
        return Err(OfferPricingError::InvalidInput {
            field: "external_unit_price".into(),
            reason: format!("Unit price of '{}' must not be negative", product.name),
        });
    }

    let unit_price = round_to_currency(unit_price_for(category, product));

    let quantity_rate = quantity_discount_rate(product, quantity, schedule)?;
    let storage_rate = storage_discount_rate(category, product);
    let discount_rate = round_rate(quantity_rate.max(storage_rate));
    if discount_rate < Decimal::ZERO || discount_rate > Decimal::ONE {
        return Err(OfferPricingError::InvalidRatio {
            name: "discount_rate".into(),
            value: discount_rate,
        });
    }

    let list_price = round_to_currency(checked_product(unit_price, quantity, "quantity")?);
    let unit_discount_amount =
        round_to_currency(checked_product(unit_price, discount_rate, "discount_rate")?);
    let discount_amount =
        round_to_currency(checked_product(unit_discount_amount, quantity, "quantity")?);
    let sale_price = round_to_currency(list_price - discount_amount);

    Ok(LineItem {
        product: product.clone(),
        affiliation_category: category,
        quantity,
        unit_price,
        discount_rate,
        unit_discount_amount,
        list_price,
        discount_amount,
        sale_price,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
    pub category: AffiliationCategory,
    pub product: ProductSnapshot,
    pub quantity: Quantity,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineItemReport {
    #[serde(flatten)]
    pub item: LineItem,
    pub has_discount: bool,
    pub relative_discount: Decimal,
}

/// Price a single product, wrapped with methodology and warnings.
pub fn price_line_item_report(
    input: &LineItemInput,
) -> OfferPricingResult<ComputationOutput<LineItemReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let item = price_line_item(
        input.category,
        &input.product,
        input.quantity,
        &DiscountSchedule::standard(),
    )?;

    if input.product.product_category().is_none() {
        warnings.push(format!(
            "Category '{}' is not a known product category; the item cannot be added to an offer",
            input.product.category
        ));
    }
    if input.quantity.is_zero() {
        warnings.push("Quantity is zero; all amounts are zero".to_string());
    }
    if input.product.product_category() == Some(ProductCategory::DataStorage)
        && input.category != AffiliationCategory::Internal
    {
        warnings.push("Storage discount applies to internal affiliations only".to_string());
    }

    let assumptions = serde_json::json!({
        "category": input.category,
        "product": input.product.name,
        "quantity": input.quantity.to_string(),
    });

    let report = LineItemReport {
        has_discount: item.has_discount(),
        relative_discount: item.relative_discount(),
        item,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Line item pricing: affiliation unit price, max(quantity, storage) discount, half-up rounding per step",
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}
