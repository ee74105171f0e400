use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OfferPricingError {
    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error("Ungroupable items: no billing group for {}", items.join("; "))]
    UngroupableItems { items: Vec<String> },

    #[error("Invalid quantity: {quantity} (quantities must not be negative)")]
    InvalidQuantity { quantity: Decimal },

    #[error("Invalid ratio: {name} = {value} is outside [0, 1]")]
    InvalidRatio { name: String, value: Decimal },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Stage order: {stage} requires an offer in stage {expected}, found {found}")]
    StageOrder {
        stage: String,
        expected: String,
        found: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for OfferPricingError {
    fn from(e: serde_json::Error) -> Self {
        OfferPricingError::SerializationError(e.to_string())
    }
}
