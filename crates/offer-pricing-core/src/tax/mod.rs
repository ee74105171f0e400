pub mod policy;

pub use policy::{calculate_tax_report, TaxPolicy, TaxReport, TaxReportInput};
