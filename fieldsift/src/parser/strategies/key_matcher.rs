//! Mapping JSON object keys onto schema fields.

use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use super::JsonObject;
use crate::schema::{FieldDef, Schema};

/// Renders a JSON value as field text.
///
/// Strings are used as-is, scalars via their JSON text, arrays as their
/// rendered elements joined by a space and objects as compact JSON.
/// `null` renders to `None` and counts as absent.
///
/// ```
/// use fieldsift::parser::strategies::render_value;
/// use serde_json::json;
///
/// assert_eq!(render_value(&json!("ok")).as_deref(), Some("ok"));
/// assert_eq!(render_value(&json!(["a.", "b."])).as_deref(), Some("a. b."));
/// assert_eq!(render_value(&json!(null)), None);
/// ```
pub fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => Some(value.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(render_value).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
    }
}

/// Finds the object value for one field.
///
/// An exact, case-sensitive key match wins. Otherwise each synonym is tried
/// in declared order against the keys in serialized order; the first key
/// containing the synonym case-insensitively decides the field, so an
/// earlier synonym beats a later one even when the later one names a more
/// specific key.
fn lookup<'a>(field: &FieldDef, object: &'a JsonObject) -> Option<(&'a str, &'a Value)> {
    if let Some((key, value)) = object.get_key_value(&field.name) {
        return Some((key.as_str(), value));
    }

    field.synonyms.iter().find_map(|synonym| {
        let needle = synonym.to_lowercase();
        object
            .iter()
            .find(|(key, _)| key.to_lowercase().contains(&needle))
            .map(|(key, value)| (key.as_str(), value))
    })
}

/// Maps object keys to schema fields. Unmatched fields are left absent.
pub fn map_fields(schema: &Schema, object: &JsonObject) -> HashMap<String, String> {
    let mut mapped = HashMap::new();

    for field in schema.fields() {
        if let Some((key, value)) = lookup(field, object) {
            match render_value(value) {
                Some(text) => {
                    trace!(field = %field.name, key, "mapped JSON key");
                    mapped.insert(field.name.clone(), text);
                }
                None => {
                    trace!(field = %field.name, key, "JSON key holds no content");
                }
            }
        }
    }

    mapped
}
