use serde::{Deserialize, Serialize};

const GERMANY: &str = "Germany";

/// Classification of a customer relationship.
///
/// Drives unit-price selection, storage-discount eligibility and the
/// overhead ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AffiliationCategory {
    /// Within the home university or university hospital
    Internal,
    /// Outside, but a public research institution
    ExternalAcademic,
    /// Outside and not academic (companies, private sector)
    External,
}

impl AffiliationCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AffiliationCategory::Internal => "internal",
            AffiliationCategory::ExternalAcademic => "external academic",
            AffiliationCategory::External => "external",
        }
    }

    /// Parse the display label, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        [
            AffiliationCategory::Internal,
            AffiliationCategory::ExternalAcademic,
            AffiliationCategory::External,
        ]
        .into_iter()
        .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl std::fmt::Display for AffiliationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Customer affiliation selected for pricing an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    pub organization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_addition: Option<String>,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub category: AffiliationCategory,
}

impl Affiliation {
    pub fn is_in_germany(&self) -> bool {
        is_germany(&self.country)
    }
}

/// Country comparison used by the tax policies. Case-insensitive.
pub fn is_germany(country: &str) -> bool {
    country.trim().eq_ignore_ascii_case(GERMANY)
}
