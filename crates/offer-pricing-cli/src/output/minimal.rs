use serde_json::Value;

use super::{result_of, scalar_text};

/// Headline values, in order of preference: an offer's total cost, a line
/// item's sale price, a schedule lookup's rate, a tax report's VAT.
const PRIORITY_KEYS: [&str; 4] = ["total_cost", "sale_price", "discount_rate", "total_vat"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = result_of(value);

    if let Value::Object(map) = result {
        if let Some(val) = PRIORITY_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|val| !val.is_null())
        {
            return scalar_text(val);
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, scalar_text(val));
        }
    }

    scalar_text(result)
}
