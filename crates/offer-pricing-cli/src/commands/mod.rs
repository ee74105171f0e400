pub mod discount;
pub mod line_item;
pub mod offer;
pub mod tax;
