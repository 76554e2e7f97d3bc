use crate::api::constants;
use crate::api::pagination::extract_items;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::cache::FetchMethod;

/// One selectable dropdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub id: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Parse one item, probing `id`/`value` then `name`/`label`/`title`/`label_key`
    pub fn from_item(item: &Value, label_key: Option<&str>) -> Option<Self> {
        let id = ["id", "value"].iter().find_map(|k| scalar(item.get(*k)))?;

        let label = label_key
            .into_iter()
            .chain(["name", "label", "title"])
            .find_map(|k| scalar(item.get(k)))
            .unwrap_or_else(|| id.clone());

        Some(Self { id, label })
    }
}

/// Options from any supported list payload; items without an id are skipped
pub fn options_from_payload(payload: &Value, label_key: Option<&str>) -> Vec<DropdownOption> {
    extract_items(payload)
        .iter()
        .filter_map(|item| DropdownOption::from_item(item, label_key))
        .collect()
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Top-of-chain reference lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceList {
    States,
    /// Brands for an electronics subcategory
    Brands { subcategory_id: Option<u32> },
}

impl ReferenceList {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ReferenceList::States => constants::STATES_ENDPOINT,
            ReferenceList::Brands { .. } => constants::BRANDS_ENDPOINT,
        }
    }

    pub fn method(&self) -> FetchMethod {
        FetchMethod::Get
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            ReferenceList::States => "state_name",
            ReferenceList::Brands { .. } => "brand_name",
        }
    }

    pub fn params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if let ReferenceList::Brands {
            subcategory_id: Some(id),
        } = self
        {
            params.insert("subcategory_id".to_string(), id.to_string());
        }
        params
    }
}
