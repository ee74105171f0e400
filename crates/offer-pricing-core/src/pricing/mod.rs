pub mod grouping;
pub mod line_item;
pub mod offer;
pub mod overhead;

pub use grouping::{group_line_items, GroupTotals, GroupedItems};
pub use line_item::{price_line_item, price_line_item_report, LineItem, LineItemInput, LineItemReport};
pub use offer::{
    price_offer, run_pipeline, Offer, OfferInput, OfferItemInput, Person, PricingStage,
    ProjectInformation,
};
pub use overhead::{group_overhead, overhead_ratio, overheads_for, OverheadBreakdown};
