use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ListingStatus {
    Available,
    Sold,
    Pending,
    Unknown(String),
}

impl ListingStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" | "active" => ListingStatus::Available,
            "sold" | "soldout" | "sold_out" | "sold-out" => ListingStatus::Sold,
            "pending" => ListingStatus::Pending,
            other => ListingStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingStatus::Available => f.write_str("available"),
            ListingStatus::Sold => f.write_str("sold"),
            ListingStatus::Pending => f.write_str("pending"),
            ListingStatus::Unknown(other) => write!(f, "{}", other),
        }
    }
}

/// Why a listing cannot be opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NavigationBlock {
    #[error("This listing has already been sold")]
    Sold,
    #[error("This listing is not published yet")]
    Unpublished,
}

/// A feed entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: String,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub status: ListingStatus,
    pub published: bool,
    #[serde(skip)]
    pub raw: Value,
}

impl Listing {
    /// Parse a feed item; items without an id are rejected
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = match value.get("id")? {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        let price = match value.get("price") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };

        let status = value
            .get("status")
            .and_then(Value::as_str)
            .map(ListingStatus::parse)
            .unwrap_or(ListingStatus::Available);

        let published = ["is_published", "published"]
            .iter()
            .find_map(|key| value.get(*key))
            .map(truthy)
            .unwrap_or(true);

        Some(Self {
            id,
            title: value.get("title").and_then(Value::as_str).map(str::to_string),
            price,
            status,
            published,
            raw: value.clone(),
        })
    }

    /// Sold takes precedence over unpublished
    pub fn navigability(&self) -> Result<(), NavigationBlock> {
        if self.status == ListingStatus::Sold {
            return Err(NavigationBlock::Sold);
        }
        if !self.published {
            return Err(NavigationBlock::Unpublished);
        }
        Ok(())
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_vocabulary() {
        assert_eq!(ListingStatus::parse("SoldOut"), ListingStatus::Sold);
        assert_eq!(ListingStatus::parse("sold"), ListingStatus::Sold);
        assert_eq!(ListingStatus::parse("pending"), ListingStatus::Pending);
        assert_eq!(ListingStatus::parse("archived"), ListingStatus::Unknown("archived".into()));
    }

    #[test]
    fn test_navigability() {
        let open = Listing::from_value(&json!({"id": 1, "status": "available"})).unwrap();
        assert_eq!(open.navigability(), Ok(()));

        let sold = Listing::from_value(&json!({"id": 2, "status": "soldout", "is_published": 0})).unwrap();
        assert_eq!(sold.navigability(), Err(NavigationBlock::Sold));

        let draft = Listing::from_value(&json!({"id": 3, "status": "pending", "published": false})).unwrap();
        assert_eq!(draft.navigability(), Err(NavigationBlock::Unpublished));

        assert_ne!(NavigationBlock::Sold.to_string(), NavigationBlock::Unpublished.to_string());
    }

    #[test]
    fn test_fields() {
        let listing = Listing::from_value(&json!({"id": "a1", "title": "Flat", "price": "1200.5"})).unwrap();
        assert_eq!(listing.price, Some(1200.5));
        assert!(listing.published);
        assert!(Listing::from_value(&json!({"title": "no id"})).is_none());
    }
}
