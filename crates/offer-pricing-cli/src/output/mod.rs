pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` of a computation envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Scalar fields of an object as (key, text) pairs; nested objects are
/// flattened with dotted keys, arrays are skipped.
pub(crate) fn flatten_fields(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    if let Value::Object(map) = value {
        for (key, val) in map {
            let name = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match val {
                Value::Object(_) => flatten_fields(&name, val, out),
                Value::Array(_) => {}
                _ => out.push((name, scalar_text(val))),
            }
        }
    }
}

pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// One row per priced line item, for offers.
pub(crate) const ITEM_COLUMNS: [&str; 8] = [
    "product",
    "category",
    "quantity",
    "unit_price",
    "discount_rate",
    "list_price",
    "discount_amount",
    "sale_price",
];

pub(crate) fn item_row(item: &Value) -> Vec<String> {
    ITEM_COLUMNS
        .iter()
        .map(|column| match *column {
            "product" => item.pointer("/product/name").map(scalar_text),
            "category" => item.pointer("/product/category").map(scalar_text),
            other => item.get(other).map(scalar_text),
        })
        .map(Option::unwrap_or_default)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_totals() {
        let value = json!({
            "total_cost": "10.00",
            "net_sums": { "data_generation": "4.00" },
            "items": [ { "sale_price": "1.00" } ]
        });
        let mut fields = Vec::new();
        flatten_fields("", &value, &mut fields);
        assert!(fields.contains(&("total_cost".to_string(), "10.00".to_string())));
        assert!(fields.contains(&("net_sums.data_generation".to_string(), "4.00".to_string())));
        assert!(!fields.iter().any(|(k, _)| k.starts_with("items")));
    }

    #[test]
    fn test_item_row_reads_product_snapshot() {
        let item = json!({
            "product": { "name": "Mapping", "category": "Primary Bioinformatics" },
            "quantity": "30",
            "sale_price": "1350.00"
        });
        let row = item_row(&item);
        assert_eq!(row[0], "Mapping");
        assert_eq!(row[1], "Primary Bioinformatics");
        assert_eq!(row[2], "30");
        assert_eq!(row[3], "");
        assert_eq!(row[7], "1350.00");
    }
}
