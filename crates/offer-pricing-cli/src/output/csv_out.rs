use serde_json::Value;
use std::io;

use super::{flatten_fields, item_row, result_of, ITEM_COLUMNS};

/// Write output as CSV to stdout: one row per line item for offers,
/// otherwise a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let result = result_of(value);

    match result.get("items") {
        Some(Value::Array(items)) => {
            let _ = wtr.write_record(ITEM_COLUMNS);
            for item in items {
                let _ = wtr.write_record(item_row(item));
            }
        }
        _ => {
            let mut fields = Vec::new();
            flatten_fields("", result, &mut fields);
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in &fields {
                let _ = wtr.write_record([key, val]);
            }
        }
    }

    let _ = wtr.flush();
}
