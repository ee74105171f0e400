use offer_pricing_core::catalog::{AffiliationCategory, ProductSnapshot};
use offer_pricing_core::discount::{DiscountSchedule, DiscountTier};
use offer_pricing_core::pricing::price_line_item;
use offer_pricing_core::OfferPricingError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn analysis_product(external: Decimal) -> ProductSnapshot {
    ProductSnapshot {
        category: "Secondary Bioinformatics".into(),
        description: String::new(),
        name: "Differential expression".into(),
        internal_unit_price: external / dec!(2),
        external_unit_price: external,
        unit: "Sample".into(),
        service_provider: "QBiC".into(),
    }
}

// ===========================================================================
// Standard schedule
// ===========================================================================

#[test]
fn test_known_points_on_standard_schedule() {
    let schedule = DiscountSchedule::standard();
    let cases = [
        (dec!(0), dec!(0)),
        (dec!(1), dec!(0)),
        (dec!(2), dec!(0.02)),
        (dec!(10), dec!(0.33)),
        (dec!(23), dec!(0.51)),
        (dec!(100), dec!(0.70)),
        (dec!(999), dec!(0.82)),
        (dec!(1000), dec!(0.82)),
        (dec!(250000), dec!(0.82)),
    ];
    for (quantity, expected) in cases {
        assert_eq!(schedule.rate(quantity).unwrap(), expected, "quantity {quantity}");
    }
}

#[test]
fn test_fractional_quantities_use_whole_units() {
    let schedule = DiscountSchedule::standard();
    assert_eq!(schedule.rate(dec!(4.99)).unwrap(), schedule.rate(dec!(4)).unwrap());
    assert_eq!(schedule.rate(dec!(0.5)).unwrap(), Decimal::ZERO);
}

#[test]
fn test_negative_quantity_rejected() {
    match DiscountSchedule::standard().rate(dec!(-0.5)) {
        Err(OfferPricingError::InvalidQuantity { quantity }) => assert_eq!(quantity, dec!(-0.5)),
        other => panic!("Expected InvalidQuantity, got {other:?}"),
    }
}

#[test]
fn test_plateau_is_last_rate() {
    assert_eq!(DiscountSchedule::standard().plateau(), dec!(0.82));
}

// ===========================================================================
// Custom schedules
// ===========================================================================

#[test]
fn test_custom_schedule_drives_line_item() {
    let schedule = DiscountSchedule::new(vec![
        DiscountTier { upper_bound: 9, rate: dec!(0) },
        DiscountTier { upper_bound: u32::MAX, rate: dec!(0.25) },
    ])
    .unwrap();

    let item = price_line_item(
        AffiliationCategory::External,
        &analysis_product(dec!(80.00)),
        dec!(10),
        &schedule,
    )
    .unwrap();
    assert_eq!(item.discount_rate(), dec!(0.25));
    assert_eq!(item.sale_price(), dec!(600.00));

    let repriced = item.with_quantity(dec!(9), &schedule).unwrap();
    assert_eq!(repriced.discount_rate(), dec!(0));
    assert_eq!(repriced.sale_price(), dec!(720.00));
}

#[test]
fn test_custom_schedule_validation() {
    assert!(matches!(
        DiscountSchedule::new(vec![]),
        Err(OfferPricingError::InvalidInput { .. })
    ));
    assert!(matches!(
        DiscountSchedule::new(vec![DiscountTier { upper_bound: 5, rate: dec!(1.5) }]),
        Err(OfferPricingError::InvalidRatio { .. })
    ));
    assert!(matches!(
        DiscountSchedule::new(vec![
            DiscountTier { upper_bound: 5, rate: dec!(0.3) },
            DiscountTier { upper_bound: 10, rate: dec!(0.2) },
        ]),
        Err(OfferPricingError::InvalidInput { .. })
    ));
}

#[test]
fn test_larger_order_never_costs_less_per_unit_discount() {
    let schedule = DiscountSchedule::standard();
    let product = analysis_product(dec!(37.41));
    let mut previous = Decimal::ZERO;
    for q in 1..=1200u32 {
        let item = price_line_item(AffiliationCategory::External, &product, Decimal::from(q), &schedule)
            .unwrap();
        assert!(item.unit_discount_amount() >= previous, "quantity {q}");
        previous = item.unit_discount_amount();
    }
}
