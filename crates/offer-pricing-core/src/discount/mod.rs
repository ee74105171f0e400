pub mod schedule;

pub use schedule::{DiscountSchedule, DiscountTier};
