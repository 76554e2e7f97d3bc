//! Field validation
//!
//! Values live as strings in the snapshot; they are parsed here. Messages are
//! specific to the field kind so a bad number never reads as "required".

use super::config::CategoryConfig;
use super::field::{Field, FieldKind};
use super::snapshot::FormSnapshot;
use std::collections::BTreeMap;

pub type ValidationMessage = String;

pub fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Validate one value against its kind and requiredness
pub fn validate_value(field: Field, value: &str, required: bool) -> Result<(), ValidationMessage> {
    let value = value.trim();
    let label = field.label();

    if value.is_empty() {
        return if required {
            Err(format!("{} is required", label))
        } else {
            Ok(())
        };
    }

    match field.kind() {
        FieldKind::Text { min, max } => {
            let len = value.chars().count();
            if len < min {
                Err(format!("{} must be at least {} characters", label, min))
            } else if len > max {
                Err(format!("{} must be at most {} characters", label, max))
            } else {
                Ok(())
            }
        }
        FieldKind::Float => {
            let number = parse_float(value).ok_or_else(|| format!("{} must be a valid number", label))?;
            if field == Field::Price && number <= 0.0 {
                Err("Price must be greater than zero".to_string())
            } else if number < 0.0 {
                Err(format!("{} cannot be negative", label))
            } else {
                Ok(())
            }
        }
        FieldKind::Integer => {
            let number = parse_integer(value).ok_or_else(|| format!("{} must be a whole number", label))?;
            if number < 0 {
                Err(format!("{} cannot be negative", label))
            } else {
                Ok(())
            }
        }
        FieldKind::Choice(choices) => {
            if choices.contains(&value) {
                Ok(())
            } else {
                Err(format!("{} must be one of: {}", label, choices.join(", ")))
            }
        }
        FieldKind::Dropdown => Ok(()),
    }
}

/// Validate `field` as the active category sees it; hidden fields always pass
pub fn validate_field(snapshot: &FormSnapshot, config: &CategoryConfig, field: Field) -> Result<(), ValidationMessage> {
    if !config.should_show_field(field) {
        return Ok(());
    }
    validate_value(field, snapshot.value(field), config.is_required(field))?;

    if field == Field::FloorNumber || field == Field::TotalFloor {
        check_floors(snapshot, config)?;
    }
    Ok(())
}

fn check_floors(snapshot: &FormSnapshot, config: &CategoryConfig) -> Result<(), ValidationMessage> {
    if !config.should_show_field(Field::FloorNumber) || !config.should_show_field(Field::TotalFloor) {
        return Ok(());
    }
    let floor = parse_integer(snapshot.value(Field::FloorNumber));
    let total = parse_integer(snapshot.value(Field::TotalFloor));
    match (floor, total) {
        (Some(floor), Some(total)) if floor > total => Err("Floor number cannot exceed total floors".to_string()),
        _ => Ok(()),
    }
}

/// Every error on the form, keyed by field in display order
pub fn validate_all(snapshot: &FormSnapshot, config: &CategoryConfig) -> BTreeMap<Field, ValidationMessage> {
    let mut errors = BTreeMap::new();
    for field in config.visible_fields() {
        if let Err(message) = validate_value(field, snapshot.value(field), config.is_required(field)) {
            errors.insert(field, message);
        }
    }
    if !errors.contains_key(&Field::FloorNumber) && !errors.contains_key(&Field::TotalFloor) {
        if let Err(message) = check_floors(snapshot, config) {
            errors.insert(Field::FloorNumber, message);
        }
    }
    errors
}

/// `length x breadth` when both are positive numbers, rounded to 2 places
pub fn derive_plot_area(length: &str, breadth: &str) -> Option<String> {
    let length = parse_float(length).filter(|v| *v > 0.0)?;
    let breadth = parse_float(breadth).filter(|v| *v > 0.0)?;
    let area = (length * breadth * 100.0).round() / 100.0;
    Some(format!("{}", area))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_specific_messages() {
        assert_eq!(validate_value(Field::Price, "", true), Err("Price is required".into()));
        assert_eq!(validate_value(Field::Price, "12abc", true), Err("Price must be a valid number".into()));
        assert_eq!(validate_value(Field::Price, "0", true), Err("Price must be greater than zero".into()));
        assert_eq!(validate_value(Field::Bhk, "2.5", true), Err("BHK must be a whole number".into()));
        assert_eq!(validate_value(Field::CarpetArea, "-3", true), Err("Carpet area cannot be negative".into()));
        assert!(validate_value(Field::Furnished, "semi-furnished", true).is_ok());
        assert!(validate_value(Field::Furnished, "partly", true).unwrap_err().contains("must be one of"));
        assert!(validate_value(Field::Title, "ab", true).unwrap_err().contains("at least 3"));
        assert!(validate_value(Field::Warranty, "", false).is_ok());
    }

    #[test]
    fn test_plot_area_derivation() {
        assert_eq!(derive_plot_area("50", "20"), Some("1000".into()));
        assert_eq!(derive_plot_area("12.5", "3"), Some("37.5".into()));
        assert_eq!(derive_plot_area("10.333", "3"), Some("31".into()));
        assert_eq!(derive_plot_area("50", ""), None);
        assert_eq!(derive_plot_area("0", "20"), None);
        assert_eq!(derive_plot_area("x", "20"), None);
    }

    #[test]
    fn test_floor_cross_check() {
        let config = CategoryConfig::resolve("for-sale-houses-apartments", None);
        let mut snapshot = FormSnapshot::new();
        snapshot.set(Field::FloorNumber, "7");
        snapshot.set(Field::TotalFloor, "5");

        assert_eq!(
            validate_field(&snapshot, &config, Field::TotalFloor),
            Err("Floor number cannot exceed total floors".into())
        );
        let errors = validate_all(&snapshot, &config);
        assert_eq!(
            errors.get(&Field::FloorNumber).map(String::as_str),
            Some("Floor number cannot exceed total floors")
        );
        assert!(!errors.contains_key(&Field::TotalFloor));
    }

    #[test]
    fn test_hidden_fields_pass() {
        let config = CategoryConfig::resolve("lands-plots", None);
        let snapshot = FormSnapshot::new();
        assert!(validate_field(&snapshot, &config, Field::Bhk).is_ok());
        assert!(validate_field(&snapshot, &config, Field::PlotArea).is_err());
    }
}
