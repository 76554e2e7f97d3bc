//! Backend error keys to form field names
//!
//! Keys belonging to a [`Field`] map to its UI name. A few payload-only keys
//! have fixed targets. Anything else passes through unchanged.

use crate::form::field::Field;
use serde_json::Value;
use std::collections::BTreeMap;

const EXTRA_KEYS: &[(&str, &str)] = &[
    ("subcategory_id", "category"),
    ("action_id", "listing"),
    ("media_to_delete", "media"),
    ("existing_images", "images"),
    ("existing_videos", "videos"),
];

/// Frontend name for a backend error key; `images.0` and `images` map alike
pub fn frontend_name(backend_key: &str) -> String {
    let base = backend_key.split('.').next().unwrap_or(backend_key);

    if let Some(field) = Field::from_backend_name(base) {
        return field.as_str().to_string();
    }
    EXTRA_KEYS
        .iter()
        .find(|(backend, _)| *backend == base)
        .map(|(_, frontend)| frontend.to_string())
        .unwrap_or_else(|| base.to_string())
}

/// Field errors from an error body, keyed by frontend name.
///
/// Reads `errors`, `data.errors` or the body itself; each message is the
/// first element of its array.
pub fn map_errors(body: &Value) -> BTreeMap<String, String> {
    let source = body
        .get("errors")
        .or_else(|| body.get("data").and_then(|d| d.get("errors")))
        .unwrap_or(body);

    let mut errors = BTreeMap::new();
    let Some(map) = source.as_object() else {
        return errors;
    };

    for (key, value) in map {
        if key == "message" {
            continue;
        }
        let message = match value {
            Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
            Value::String(s) => Some(s.clone()),
            _ => None,
        };
        if let Some(message) = message {
            errors.entry(frontend_name(key)).or_insert(message);
        }
    }
    errors
}

/// Top-level `message` of an error body
pub fn error_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("data").and_then(|d| d.get("message")))
        .and_then(Value::as_str)
        .map(str::to_string)
}
