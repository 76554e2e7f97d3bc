//! Canonical list envelope
//!
//! The backend answers list endpoints in several shapes. [`normalize`] is the
//! only place that knows about them; everything downstream sees a
//! [`PaginatedList`].
//!
//! Probe order:
//! 1. `{data: {data: [...], current_page, last_page, total, next_page_url}}`
//! 2. `{data: [...]}`
//! 3. `[...]`
//! 4. `{items: [...]}`
//! 5. `{results: [...]}`
//! 6. the first array found anywhere in the payload (depth first)
//!
//! A payload with no array at all is an empty list.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedList<T> {
    pub items: Vec<T>,
    pub current_page: Option<u32>,
    pub last_page: Option<u32>,
    pub total: Option<u64>,
    pub next_page_url: Option<String>,
}

impl<T> Default for PaginatedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: None,
            last_page: None,
            total: None,
            next_page_url: None,
        }
    }
}

impl<T> PaginatedList<T> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Whether another page exists after this one.
    ///
    /// Pagination metadata wins when present; otherwise a full page implies
    /// there may be more.
    pub fn has_more(&self, per_page: usize) -> bool {
        if let Some(url) = &self.next_page_url {
            return !url.is_empty();
        }
        if let (Some(current), Some(last)) = (self.current_page, self.last_page) {
            return current < last;
        }
        if self.current_page.is_some() || self.last_page.is_some() {
            // Partial metadata with no next link: treat as final
            return false;
        }
        per_page > 0 && self.items.len() >= per_page
    }

    pub fn map<U, F>(self, f: F) -> PaginatedList<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedList {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            last_page: self.last_page,
            total: self.total,
            next_page_url: self.next_page_url,
        }
    }

    /// Keep only items for which `f` returns `Some`
    pub fn filter_map<U, F>(self, f: F) -> PaginatedList<U>
    where
        F: FnMut(T) -> Option<U>,
    {
        PaginatedList {
            items: self.items.into_iter().filter_map(f).collect(),
            current_page: self.current_page,
            last_page: self.last_page,
            total: self.total,
            next_page_url: self.next_page_url,
        }
    }
}

/// Normalize any supported list payload
pub fn normalize(payload: &Value) -> PaginatedList<Value> {
    if let Some(data) = payload.get("data") {
        if let Some(items) = data.get("data").and_then(Value::as_array) {
            return PaginatedList {
                items: items.clone(),
                current_page: number(data.get("current_page")).map(|n| n as u32),
                last_page: number(data.get("last_page")).map(|n| n as u32),
                total: number(data.get("total")),
                next_page_url: data
                    .get("next_page_url")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            };
        }
        if let Some(items) = data.as_array() {
            return PaginatedList::from_items(items.clone());
        }
    }

    if let Some(items) = payload.as_array() {
        return PaginatedList::from_items(items.clone());
    }

    for key in ["items", "results"] {
        if let Some(items) = payload.get(key).and_then(Value::as_array) {
            return PaginatedList::from_items(items.clone());
        }
    }

    match find_first_array(payload) {
        Some(items) => PaginatedList::from_items(items.clone()),
        None => PaginatedList::empty(),
    }
}

/// Items only, discarding pagination metadata
pub fn extract_items(payload: &Value) -> Vec<Value> {
    normalize(payload).items
}

/// Depth-first search for the first array in `value`
pub fn find_first_array(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.values().find_map(find_first_array),
        _ => None,
    }
}

fn number(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
