use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::catalog::AffiliationCategory;
use crate::error::OfferPricingError;
use crate::pricing::grouping::{GroupTotals, GroupedItems};
use crate::pricing::line_item::LineItem;
use crate::types::{checked_sum, round_to_currency, Money, Rate};
use crate::OfferPricingResult;

const OVERHEAD_RATIO_EXTERNAL_ACADEMIC: Rate = dec!(0.20);
const OVERHEAD_RATIO_EXTERNAL: Rate = dec!(0.40);

/// Surcharge ratio on net sale prices for an affiliation category.
pub fn overhead_ratio(category: AffiliationCategory) -> Rate {
    match category {
        AffiliationCategory::Internal => Decimal::ZERO,
        AffiliationCategory::ExternalAcademic => OVERHEAD_RATIO_EXTERNAL_ACADEMIC,
        AffiliationCategory::External => OVERHEAD_RATIO_EXTERNAL,
    }
}

/// Overhead on one group: sum of positive sale prices times `ratio`,
/// rounded to currency. No category filter is applied here.
pub fn group_overhead(items: &[LineItem], ratio: Rate) -> OfferPricingResult<Money> {
    if ratio < Decimal::ZERO || ratio > Decimal::ONE {
        return Err(OfferPricingError::InvalidRatio {
            name: "overhead_ratio".into(),
            value: ratio,
        });
    }

    let overhead = checked_sum(
        items
            .iter()
            .map(|i| i.sale_price())
            .filter(|p| *p > Decimal::ZERO)
            .map(|p| p * ratio),
        "overhead",
    )?;

    Ok(round_to_currency(overhead))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverheadBreakdown {
    pub ratio: Rate,
    pub per_group: GroupTotals,
    pub total: Money,
}

/// Per-group overheads, each rounded before they are added up. The total
/// is the sum of the rounded group amounts, not `net * ratio`.
pub fn overheads_for(
    groups: &GroupedItems,
    category: AffiliationCategory,
) -> OfferPricingResult<OverheadBreakdown> {
    let ratio = overhead_ratio(category);
    let per_group = groups.totals(|items| group_overhead(items, ratio))?;
    let total = round_to_currency(per_group.total()?);

    Ok(OverheadBreakdown {
        ratio,
        per_group,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductSnapshot;
    use crate::discount::DiscountSchedule;
    use crate::pricing::grouping::group_line_items;
    use crate::pricing::line_item::price_line_item;
    use rust_decimal_macros::dec;

    fn item(category: &str, unit_price: Money, quantity: Decimal, affiliation: AffiliationCategory) -> LineItem {
        let product = ProductSnapshot {
            category: category.into(),
            description: String::new(),
            name: format!("{category} item"),
            internal_unit_price: unit_price,
            external_unit_price: unit_price,
            unit: "Sample".into(),
            service_provider: "QBiC".into(),
        };
        price_line_item(affiliation, &product, quantity, &DiscountSchedule::standard()).unwrap()
    }

    #[test]
    fn test_overhead_ratios() {
        assert_eq!(overhead_ratio(AffiliationCategory::Internal), dec!(0));
        assert_eq!(overhead_ratio(AffiliationCategory::ExternalAcademic), dec!(0.20));
        assert_eq!(overhead_ratio(AffiliationCategory::External), dec!(0.40));
    }

    #[test]
    fn test_group_overhead_rejects_bad_ratio() {
        assert!(matches!(
            group_overhead(&[], dec!(1.01)),
            Err(OfferPricingError::InvalidRatio { .. })
        ));
        assert!(matches!(
            group_overhead(&[], dec!(-0.01)),
            Err(OfferPricingError::InvalidRatio { .. })
        ));
    }

    #[test]
    fn test_group_overhead_sums_sale_prices() {
        let items = vec![
            item("Sequencing", dec!(100.00), dec!(1), AffiliationCategory::External),
            item("Sequencing", dec!(50.00), dec!(2), AffiliationCategory::External),
        ];
        assert_eq!(group_overhead(&items, dec!(0.40)).unwrap(), dec!(80.00));
    }

    #[test]
    fn test_zero_sale_prices_carry_no_overhead() {
        let items = vec![item("Data Storage", dec!(5.00), dec!(10), AffiliationCategory::Internal)];
        assert_eq!(group_overhead(&items, dec!(0.20)).unwrap(), dec!(0.00));
    }

    #[test]
    fn test_rounding_per_group_before_summing() {
        // Each group: 0.03 * 0.20 = 0.006 -> 0.01; four groups -> 0.04.
        // Rounding once over the total net (0.12 * 0.20 = 0.024) would give 0.02.
        let affiliation = AffiliationCategory::ExternalAcademic;
        let items = vec![
            item("Sequencing", dec!(0.03), dec!(1), affiliation),
            item("Primary Bioinformatics", dec!(0.03), dec!(1), affiliation),
            item("Project Management", dec!(0.03), dec!(1), affiliation),
            item("External Service", dec!(0.03), dec!(1), affiliation),
        ];
        let groups = group_line_items(&items).unwrap();
        let breakdown = overheads_for(&groups, affiliation).unwrap();

        assert_eq!(breakdown.per_group.data_generation, dec!(0.01));
        assert_eq!(breakdown.per_group.data_analysis, dec!(0.01));
        assert_eq!(breakdown.per_group.project_and_data_management, dec!(0.01));
        assert_eq!(breakdown.per_group.external_services, dec!(0.01));
        assert_eq!(breakdown.total, dec!(0.04));
        assert_eq!(breakdown.ratio, dec!(0.20));
    }

    #[test]
    fn test_internal_has_no_overhead() {
        let items = vec![item("Sequencing", dec!(999.99), dec!(3), AffiliationCategory::Internal)];
        let groups = group_line_items(&items).unwrap();
        let breakdown = overheads_for(&groups, AffiliationCategory::Internal).unwrap();
        assert_eq!(breakdown.total, dec!(0.00));
    }
}
