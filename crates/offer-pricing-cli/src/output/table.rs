use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten_fields, item_row, result_of, ITEM_COLUMNS};

/// Summary table of the result, then the priced line items (for offers),
/// then warnings and methodology from the envelope.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    let mut fields = Vec::new();
    flatten_fields("", result, &mut fields);
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in &fields {
        builder.push_record([key.as_str(), val.as_str()]);
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(items)) = result.get("items") {
        if !items.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(ITEM_COLUMNS);
            for item in items {
                builder.push_record(item_row(item));
            }
            println!("\nLine items:");
            println!("{}", Table::from(builder));
        }
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
