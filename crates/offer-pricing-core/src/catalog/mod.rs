pub mod affiliation;
pub mod product;

pub use affiliation::{Affiliation, AffiliationCategory};
pub use product::{BillingGroup, ProductCategory, ProductSnapshot};
