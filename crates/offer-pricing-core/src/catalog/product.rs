use serde::{Deserialize, Serialize};

use crate::types::Money;

/// The four buckets line items are billed and surcharged in, in offer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillingGroup {
    DataGeneration,
    DataAnalysis,
    ProjectAndDataManagement,
    ExternalServices,
}

impl BillingGroup {
    pub const ALL: [BillingGroup; 4] = [
        BillingGroup::DataGeneration,
        BillingGroup::DataAnalysis,
        BillingGroup::ProjectAndDataManagement,
        BillingGroup::ExternalServices,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BillingGroup::DataGeneration => "data generation",
            BillingGroup::DataAnalysis => "data analysis",
            BillingGroup::ProjectAndDataManagement => "project & data management",
            BillingGroup::ExternalServices => "external services",
        }
    }
}

impl std::fmt::Display for BillingGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Known product categories. Catalog data carries the label as free text;
/// this table is the only place a label is given meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Sequencing,
    ProjectManagement,
    PrimaryBioinformatics,
    SecondaryBioinformatics,
    DataStorage,
    Proteomics,
    Metabolomics,
    ExternalService,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 8] = [
        ProductCategory::Sequencing,
        ProductCategory::ProjectManagement,
        ProductCategory::PrimaryBioinformatics,
        ProductCategory::SecondaryBioinformatics,
        ProductCategory::DataStorage,
        ProductCategory::Proteomics,
        ProductCategory::Metabolomics,
        ProductCategory::ExternalService,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProductCategory::Sequencing => "Sequencing",
            ProductCategory::ProjectManagement => "Project Management",
            ProductCategory::PrimaryBioinformatics => "Primary Bioinformatics",
            ProductCategory::SecondaryBioinformatics => "Secondary Bioinformatics",
            ProductCategory::DataStorage => "Data Storage",
            ProductCategory::Proteomics => "Proteomics",
            ProductCategory::Metabolomics => "Metabolomics",
            ProductCategory::ExternalService => "External Service",
        }
    }

    /// Short code used in product identifiers, e.g. "DS" for Data Storage.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            ProductCategory::Sequencing => "SE",
            ProductCategory::ProjectManagement => "PM",
            ProductCategory::PrimaryBioinformatics => "PB",
            ProductCategory::SecondaryBioinformatics => "SB",
            ProductCategory::DataStorage => "DS",
            ProductCategory::Proteomics => "PR",
            ProductCategory::Metabolomics => "ME",
            ProductCategory::ExternalService => "EXT",
        }
    }

    /// Exact label lookup. Labels are case-sensitive catalog data.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn billing_group(&self) -> BillingGroup {
        match self {
            ProductCategory::Sequencing
            | ProductCategory::Proteomics
            | ProductCategory::Metabolomics => BillingGroup::DataGeneration,
            ProductCategory::PrimaryBioinformatics | ProductCategory::SecondaryBioinformatics => {
                BillingGroup::DataAnalysis
            }
            ProductCategory::ProjectManagement | ProductCategory::DataStorage => {
                BillingGroup::ProjectAndDataManagement
            }
            ProductCategory::ExternalService => BillingGroup::ExternalServices,
        }
    }

    /// Whether the tiered quantity discount applies to this category.
    pub fn is_quantity_discountable(&self) -> bool {
        self.billing_group() == BillingGroup::DataAnalysis
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog product copied by value into a line item. Later catalog edits
/// never reach an existing line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Category label, e.g. "Primary Bioinformatics"
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub name: String,
    pub internal_unit_price: Money,
    pub external_unit_price: Money,
    /// Unit the quantity is counted in, e.g. "Sample", "TB"
    pub unit: String,
    pub service_provider: String,
}

impl ProductSnapshot {
    /// The known category for this product's label, if any.
    pub fn product_category(&self) -> Option<ProductCategory> {
        ProductCategory::from_label(&self.category)
    }

    pub fn billing_group(&self) -> Option<BillingGroup> {
        self.product_category().map(|c| c.billing_group())
    }
}
