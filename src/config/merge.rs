//! Settings layer merge
//!
//! Later layers win:
//! - Tables: merge by key
//! - Arrays and scalars: replace

use serde_json::Value;

/// Lay `upper` over `lower`.
pub fn merge_layer(lower: Value, upper: Value) -> Value {
    match (lower, upper) {
        (Value::Object(mut table), Value::Object(upper_table)) => {
            for (key, value) in upper_table {
                match table.get_mut(&key) {
                    Some(slot) => {
                        let below = slot.take();
                        *slot = merge_layer(below, value);
                    }
                    None => {
                        table.insert(key, value);
                    }
                }
            }
            Value::Object(table)
        }
        (_, upper) => upper,
    }
}

/// Merge layers in order (first is lowest precedence)
pub fn merge_layers(layers: impl IntoIterator<Item = Value>) -> Value {
    layers.into_iter().fold(Value::Null, merge_layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_override() {
        let result = merge_layer(json!({"out_dir": "./policies"}), json!({"out_dir": "/tmp/out"}));
        assert_eq!(result["out_dir"], "/tmp/out");
    }

    #[test]
    fn test_table_merges_by_key() {
        let lower = json!({"annotations": {"a": "1", "b": "2"}});
        let upper = json!({"annotations": {"b": "3", "c": "4"}});
        let result = merge_layer(lower, upper);
        assert_eq!(result["annotations"], json!({"a": "1", "b": "3", "c": "4"}));
    }

    #[test]
    fn test_array_replaced() {
        let result = merge_layer(json!({"list": [1, 2, 3]}), json!({"list": [9]}));
        assert_eq!(result["list"], json!([9]));
    }

    #[test]
    fn test_later_layers_win() {
        let result = merge_layers(vec![
            json!({"stdout": false, "file_ext": ".yaml"}),
            json!({"stdout": true}),
            json!({"file_ext": ".yml"}),
        ]);
        assert_eq!(result, json!({"stdout": true, "file_ext": ".yml"}));
    }

    #[test]
    fn test_no_layers() {
        assert!(merge_layers(Vec::new()).is_null());
    }
}
