use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::BillingGroup;
use crate::error::OfferPricingError;
use crate::pricing::line_item::LineItem;
use crate::types::{checked_sum, Money};
use crate::OfferPricingResult;

/// Priced line items partitioned into the four billing groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedItems {
    pub data_generation: Vec<LineItem>,
    pub data_analysis: Vec<LineItem>,
    pub project_and_data_management: Vec<LineItem>,
    pub external_services: Vec<LineItem>,
}

impl GroupedItems {
    pub fn get(&self, group: BillingGroup) -> &[LineItem] {
        match group {
            BillingGroup::DataGeneration => &self.data_generation,
            BillingGroup::DataAnalysis => &self.data_analysis,
            BillingGroup::ProjectAndDataManagement => &self.project_and_data_management,
            BillingGroup::ExternalServices => &self.external_services,
        }
    }

    fn get_mut(&mut self, group: BillingGroup) -> &mut Vec<LineItem> {
        match group {
            BillingGroup::DataGeneration => &mut self.data_generation,
            BillingGroup::DataAnalysis => &mut self.data_analysis,
            BillingGroup::ProjectAndDataManagement => &mut self.project_and_data_management,
            BillingGroup::ExternalServices => &mut self.external_services,
        }
    }

    /// Groups in offer order.
    pub fn iter(&self) -> impl Iterator<Item = (BillingGroup, &[LineItem])> {
        BillingGroup::ALL.into_iter().map(move |g| (g, self.get(g)))
    }

    pub fn len(&self) -> usize {
        self.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply `f` to every group's items, collecting one amount per group.
    pub fn totals<F>(&self, f: F) -> OfferPricingResult<GroupTotals>
    where
        F: Fn(&[LineItem]) -> OfferPricingResult<Money>,
    {
        Ok(GroupTotals {
            data_generation: f(&self.data_generation)?,
            data_analysis: f(&self.data_analysis)?,
            project_and_data_management: f(&self.project_and_data_management)?,
            external_services: f(&self.external_services)?,
        })
    }
}

/// One amount per billing group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub data_generation: Money,
    pub data_analysis: Money,
    pub project_and_data_management: Money,
    pub external_services: Money,
}

impl GroupTotals {
    pub fn get(&self, group: BillingGroup) -> Money {
        match group {
            BillingGroup::DataGeneration => self.data_generation,
            BillingGroup::DataAnalysis => self.data_analysis,
            BillingGroup::ProjectAndDataManagement => self.project_and_data_management,
            BillingGroup::ExternalServices => self.external_services,
        }
    }

    /// Sum over the four groups.
    pub fn total(&self) -> OfferPricingResult<Money> {
        checked_sum(BillingGroup::ALL.iter().map(|g| self.get(*g)), "total")
    }
}

/// Partition `items` by product category label. Fails listing every item
/// whose label is not in the classification table; nothing is dropped.
pub fn group_line_items(items: &[LineItem]) -> OfferPricingResult<GroupedItems> {
    let mut grouped = GroupedItems::default();
    let mut ungrouped: Vec<String> = Vec::new();

    for item in items {
        match item.product().billing_group() {
            Some(group) => grouped.get_mut(group).push(item.clone()),
            None => ungrouped.push(item.describe()),
        }
    }

    if !ungrouped.is_empty() {
        warn!(count = ungrouped.len(), "line items with unknown product category");
        return Err(OfferPricingError::UngroupableItems { items: ungrouped });
    }

    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AffiliationCategory, ProductSnapshot};
    use crate::discount::DiscountSchedule;
    use crate::pricing::line_item::price_line_item;
    use rust_decimal_macros::dec;

    fn item(name: &str, category: &str) -> LineItem {
        let product = ProductSnapshot {
            category: category.into(),
            description: String::new(),
            name: name.into(),
            internal_unit_price: dec!(10.00),
            external_unit_price: dec!(20.00),
            unit: "Sample".into(),
            service_provider: "QBiC".into(),
        };
        price_line_item(
            AffiliationCategory::External,
            &product,
            dec!(2),
            &DiscountSchedule::standard(),
        )
        .unwrap()
    }

    #[test]
    fn test_groups_by_category() {
        let items = vec![
            item("RNA-seq", "Sequencing"),
            item("Mapping", "Primary Bioinformatics"),
            item("DE analysis", "Secondary Bioinformatics"),
            item("PM", "Project Management"),
            item("Storage", "Data Storage"),
            item("MS run", "Proteomics"),
            item("LC-MS", "Metabolomics"),
            item("Partner lab", "External Service"),
        ];
        let grouped = group_line_items(&items).unwrap();
        assert_eq!(grouped.data_generation.len(), 3);
        assert_eq!(grouped.data_analysis.len(), 2);
        assert_eq!(grouped.project_and_data_management.len(), 2);
        assert_eq!(grouped.external_services.len(), 1);
        assert_eq!(grouped.len(), items.len());
    }

    #[test]
    fn test_group_order_preserves_item_order() {
        let items = vec![item("first", "Sequencing"), item("second", "Proteomics")];
        let grouped = group_line_items(&items).unwrap();
        let names: Vec<&str> = grouped
            .data_generation
            .iter()
            .map(|i| i.product().name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_unknown_categories_all_reported() {
        let items = vec![
            item("ok", "Sequencing"),
            item("mystery", "Unknown Category"),
            item("typo", "sequencing"),
        ];
        match group_line_items(&items) {
            Err(OfferPricingError::UngroupableItems { items }) => {
                assert_eq!(items.len(), 2);
                assert!(items[0].contains("mystery"));
                assert!(items[0].contains("Unknown Category"));
                assert!(items[1].contains("typo"));
            }
            other => panic!("Expected UngroupableItems, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_groups_empty() {
        let grouped = group_line_items(&[]).unwrap();
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_group_totals_sum() {
        let totals = GroupTotals {
            data_generation: dec!(1.10),
            data_analysis: dec!(2.20),
            project_and_data_management: dec!(3.30),
            external_services: dec!(4.40),
        };
        assert_eq!(totals.total().unwrap(), dec!(11.00));
        assert_eq!(totals.get(BillingGroup::DataAnalysis), dec!(2.20));
    }
}
