pub mod categories;
pub mod delete;
pub mod feed;
pub mod options;
pub mod submit;
pub mod token;
pub mod validate;

use anyhow::{Context, Result};
use listing_engine::form::Field;
use std::collections::BTreeMap;
use std::path::Path;

/// Read a JSON object of field values keyed by UI or backend field name
pub fn read_values(path: &Path) -> Result<BTreeMap<Field, String>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read values file: {:?}", path))?;
    let json: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse values file: {:?}", path))?;
    let map = json.as_object().context("Values file must contain a JSON object")?;

    let mut values = BTreeMap::new();
    for (key, value) in map {
        let field = match Field::from_backend_name(key) {
            Some(field) => field,
            None => key.parse::<Field>()?,
        };
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Null => continue,
            other => anyhow::bail!("Unsupported value for '{}': {}", key, other),
        };
        values.insert(field, text);
    }
    Ok(values)
}
