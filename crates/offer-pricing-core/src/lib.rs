pub mod catalog;
pub mod discount;
pub mod error;
pub mod pricing;
pub mod tax;
pub mod types;

#[cfg(feature = "checksum")]
pub mod checksum;

pub use error::OfferPricingError;
pub use types::*;

/// Standard result type for all offer pricing operations
pub type OfferPricingResult<T> = Result<T, OfferPricingError>;
