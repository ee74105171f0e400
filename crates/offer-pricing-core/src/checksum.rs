use sha2::{Digest, Sha256};

use crate::pricing::Offer;

/// SHA-256 of the fields that identify an offer, as lowercase hex.
///
/// Covers, in order: project title, objective, experimental design (if
/// any), each item's product name and quantity, the customer's and the
/// project manager's last names, and the selected affiliation's
/// organisation and street. Prices are not part of the digest.
pub fn offer_checksum(offer: &Offer) -> String {
    let mut hasher = Sha256::new();

    let project = offer.project();
    hasher.update(project.title.as_bytes());
    hasher.update(project.objective.as_bytes());
    if let Some(design) = &project.experimental_design {
        hasher.update(design.as_bytes());
    }

    for item in offer.items() {
        hasher.update(item.product().name.as_bytes());
        hasher.update(item.quantity().normalize().to_string().as_bytes());
    }

    hasher.update(offer.customer().last_name.as_bytes());
    hasher.update(offer.project_manager().last_name.as_bytes());

    let affiliation = offer.affiliation();
    hasher.update(affiliation.organization.as_bytes());
    hasher.update(affiliation.street.as_bytes());

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Affiliation, AffiliationCategory, ProductSnapshot};
    use crate::discount::DiscountSchedule;
    use crate::pricing::{Offer, OfferInput, OfferItemInput, Person, ProjectInformation};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn input(quantity: Decimal, category: AffiliationCategory) -> OfferInput {
        OfferInput {
            customer: Person {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: String::new(),
            },
            project_manager: Person {
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                email: String::new(),
            },
            affiliation: Affiliation {
                organization: "Example GmbH".into(),
                address_addition: None,
                street: "Hauptstraße 1".into(),
                postal_code: "10115".into(),
                city: "Berlin".into(),
                country: "Germany".into(),
                category,
            },
            project: ProjectInformation {
                title: "Proteome".into(),
                objective: "Quantify".into(),
                experimental_design: Some("Two conditions".into()),
            },
            items: vec![OfferItemInput {
                product: ProductSnapshot {
                    category: "Proteomics".into(),
                    description: String::new(),
                    name: "MS run".into(),
                    internal_unit_price: dec!(10),
                    external_unit_price: dec!(20),
                    unit: "Sample".into(),
                    service_provider: "QBiC".into(),
                },
                quantity,
            }],
            created_on: None,
            valid_until: None,
        }
    }

    fn checksum(input: &OfferInput) -> String {
        Offer::draft(input, &DiscountSchedule::standard())
            .unwrap()
            .checksum()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_checksum_is_sha256_hex() {
        let sum = checksum(&input(dec!(3), AffiliationCategory::External));
        assert_eq!(sum.len(), 64);
        assert!(sum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_checksum_ignores_quantity_scale_and_prices() {
        let a = checksum(&input(dec!(3), AffiliationCategory::External));
        let b = checksum(&input(dec!(3.00), AffiliationCategory::Internal));
        assert_eq!(a, b);
    }

    #[test]
    fn test_checksum_changes_with_quantity() {
        let a = checksum(&input(dec!(3), AffiliationCategory::External));
        let b = checksum(&input(dec!(4), AffiliationCategory::External));
        assert_ne!(a, b);
    }
}
