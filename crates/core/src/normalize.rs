//! Array-to-indexed-object normalization for tree display.
//!
//! Tree widgets that only label keyed objects lose positional information on
//! arrays. [`normalize`] rewrites every array as an object keyed by its
//! decimal indices (`"0"`, `"1"`, ...) so indices show up as ordinary keys.
//! Object key order is preserved (`serde_json` is built with `preserve_order`).

use serde_json::{Map, Value};

/// A JSON value ready for the tree widget. After [`normalize`] it holds no
/// arrays; with indexing disabled it is the raw value.
pub type DisplayValue = Value;

/// Rewrite arrays as index-keyed objects, recursively.
pub fn normalize(value: &Value) -> DisplayValue {
    match value {
        Value::Array(items) => Value::Object(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), normalize(item)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), normalize(item)))
                .collect::<Map<String, Value>>(),
        ),
        primitive => primitive.clone(),
    }
}

/// Normalize a value that may be absent. `None` stays `None` and is never
/// confused with `Some(Value::Null)`.
pub fn normalize_optional(value: Option<&Value>) -> Option<DisplayValue> {
    value.map(normalize)
}

/// Apply [`normalize`] when `show_array_indexes` is set, otherwise hand the
/// raw value to the widget unchanged.
pub fn prepare_display(value: &Value, show_array_indexes: bool) -> DisplayValue {
    if show_array_indexes {
        normalize(value)
    } else {
        value.clone()
    }
}
