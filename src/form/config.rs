//! Category configuration table
//!
//! Maps a category key to the extra fields it shows and requires, plus the
//! backend subcategory id. Common fields are shown and required everywhere.
//! Unknown keys resolve to a dynamic config with no extras.

use super::field::Field;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

const RESIDENTIAL_FIELDS: &[Field] = &[
    Field::Bhk,
    Field::Bedroom,
    Field::Bathroom,
    Field::Furnished,
    Field::ConstructionStatus,
    Field::Maintenance,
    Field::SuperBuildArea,
    Field::CarpetArea,
    Field::FloorNumber,
    Field::TotalFloor,
    Field::BikeParking,
    Field::CarParking,
];

const LAND_FIELDS: &[Field] = &[Field::PlotArea, Field::Length, Field::Breadth];

const COMMERCIAL_FIELDS: &[Field] = &[
    Field::WashRoom,
    Field::Furnished,
    Field::ConstructionStatus,
    Field::Maintenance,
    Field::SuperBuildArea,
    Field::CarpetArea,
    Field::FloorNumber,
    Field::TotalFloor,
    Field::BikeParking,
    Field::CarParking,
];

const ELECTRONICS_REQUIRED: &[Field] = &[Field::Brand, Field::Model, Field::Condition];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    ForSaleHousesApartments,
    ForRentHousesApartments,
    LandsPlots,
    ForSaleShopsOffices,
    ForRentShopsOffices,
    MobilePhones,
    Laptops,
    Tablets,
    Cameras,
    Televisions,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 10] = [
        CategoryKey::ForSaleHousesApartments,
        CategoryKey::ForRentHousesApartments,
        CategoryKey::LandsPlots,
        CategoryKey::ForSaleShopsOffices,
        CategoryKey::ForRentShopsOffices,
        CategoryKey::MobilePhones,
        CategoryKey::Laptops,
        CategoryKey::Tablets,
        CategoryKey::Cameras,
        CategoryKey::Televisions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::ForSaleHousesApartments => "for-sale-houses-apartments",
            CategoryKey::ForRentHousesApartments => "for-rent-houses-apartments",
            CategoryKey::LandsPlots => "lands-plots",
            CategoryKey::ForSaleShopsOffices => "for-sale-shops-offices",
            CategoryKey::ForRentShopsOffices => "for-rent-shops-offices",
            CategoryKey::MobilePhones => "mobile-phones",
            CategoryKey::Laptops => "laptops",
            CategoryKey::Tablets => "tablets",
            CategoryKey::Cameras => "cameras",
            CategoryKey::Televisions => "televisions",
        }
    }

    pub fn subcategory_id(&self) -> u32 {
        match self {
            CategoryKey::ForSaleHousesApartments => 1,
            CategoryKey::ForRentHousesApartments => 2,
            CategoryKey::LandsPlots => 3,
            CategoryKey::ForSaleShopsOffices => 4,
            CategoryKey::ForRentShopsOffices => 5,
            CategoryKey::MobilePhones => 11,
            CategoryKey::Laptops => 12,
            CategoryKey::Tablets => 13,
            CategoryKey::Cameras => 14,
            CategoryKey::Televisions => 15,
        }
    }

    pub fn is_electronics(&self) -> bool {
        self.subcategory_id() > 10
    }

    fn visible(&self) -> Vec<Field> {
        match self {
            CategoryKey::ForSaleHousesApartments => RESIDENTIAL_FIELDS.to_vec(),
            CategoryKey::ForRentHousesApartments => {
                let mut fields = RESIDENTIAL_FIELDS.to_vec();
                fields.push(Field::Bachelor);
                fields
            }
            CategoryKey::LandsPlots => LAND_FIELDS.to_vec(),
            CategoryKey::ForSaleShopsOffices | CategoryKey::ForRentShopsOffices => COMMERCIAL_FIELDS.to_vec(),
            _ => {
                let mut fields = ELECTRONICS_REQUIRED.to_vec();
                fields.push(Field::Warranty);
                fields
            }
        }
    }

    fn required(&self) -> Vec<Field> {
        if self.is_electronics() {
            ELECTRONICS_REQUIRED.to_vec()
        } else {
            self.visible()
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKey {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_ascii_lowercase();
        CategoryKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| anyhow::anyhow!("unknown category '{}'", value))
    }
}

/// Resolved, immutable configuration for one category key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryConfig {
    pub key: String,
    pub category: Option<CategoryKey>,
    pub subcategory_id: Option<u32>,
    pub visible_fields: BTreeSet<Field>,
    pub required_fields: BTreeSet<Field>,
}

impl CategoryConfig {
    /// Look up `key`. `context_subcategory` only applies to unknown keys.
    pub fn resolve(key: &str, context_subcategory: Option<u32>) -> Self {
        match key.parse::<CategoryKey>() {
            Ok(category) => Self::for_category(category),
            Err(_) => Self::dynamic(key, context_subcategory),
        }
    }

    pub fn for_category(category: CategoryKey) -> Self {
        Self {
            key: category.as_str().to_string(),
            category: Some(category),
            subcategory_id: Some(category.subcategory_id()),
            visible_fields: category.visible().into_iter().collect(),
            required_fields: category.required().into_iter().collect(),
        }
    }

    /// Fallback for keys the table does not know
    pub fn dynamic(key: &str, subcategory_id: Option<u32>) -> Self {
        Self {
            key: key.to_string(),
            category: None,
            subcategory_id,
            visible_fields: BTreeSet::new(),
            required_fields: BTreeSet::new(),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.category.is_none()
    }

    pub fn should_show_field(&self, field: Field) -> bool {
        field.is_common() || self.visible_fields.contains(&field)
    }

    pub fn is_required(&self, field: Field) -> bool {
        field.is_common() || self.required_fields.contains(&field)
    }

    /// Every field shown on this form, in display order
    pub fn visible_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.should_show_field(*field))
            .collect()
    }
}
