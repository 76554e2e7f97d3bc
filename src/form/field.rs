//! Form field vocabulary
//!
//! Every field the upload forms know about, with its UI name, backend name,
//! label and value kind. Declaration order is display order, which is also
//! the order used to pick the first invalid field to focus.

use std::fmt;
use std::str::FromStr;

pub const FURNISHED_CHOICES: &[&str] = &["furnished", "semi-furnished", "unfurnished"];
pub const CONSTRUCTION_STATUS_CHOICES: &[&str] = &["ready-to-move", "under-construction"];
pub const BACHELOR_CHOICES: &[&str] = &["yes", "no"];
pub const CONDITION_CHOICES: &[&str] = &["new", "like-new", "used", "refurbished"];

/// How a field's string value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text { min: usize, max: usize },
    /// Monetary or area value, parsed as `f64`
    Float,
    /// Count, parsed as `i64`
    Integer,
    Choice(&'static [&'static str]),
    /// Id selected from a reference-data dropdown
    Dropdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Title,
    Description,
    Price,
    State,
    District,
    City,
    Brand,
    Model,
    Condition,
    Warranty,
    Bhk,
    Bedroom,
    Bathroom,
    Furnished,
    ConstructionStatus,
    Bachelor,
    WashRoom,
    Maintenance,
    SuperBuildArea,
    CarpetArea,
    PlotArea,
    Length,
    Breadth,
    FloorNumber,
    TotalFloor,
    BikeParking,
    CarParking,
}

impl Field {
    pub const ALL: [Field; 27] = [
        Field::Title,
        Field::Description,
        Field::Price,
        Field::State,
        Field::District,
        Field::City,
        Field::Brand,
        Field::Model,
        Field::Condition,
        Field::Warranty,
        Field::Bhk,
        Field::Bedroom,
        Field::Bathroom,
        Field::Furnished,
        Field::ConstructionStatus,
        Field::Bachelor,
        Field::WashRoom,
        Field::Maintenance,
        Field::SuperBuildArea,
        Field::CarpetArea,
        Field::PlotArea,
        Field::Length,
        Field::Breadth,
        Field::FloorNumber,
        Field::TotalFloor,
        Field::BikeParking,
        Field::CarParking,
    ];

    /// Fields shown and required on every form
    pub const COMMON: [Field; 6] = [
        Field::Title,
        Field::Description,
        Field::Price,
        Field::State,
        Field::District,
        Field::City,
    ];

    /// Name used by the UI and in the form error map
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Price => "price",
            Field::State => "state",
            Field::District => "district",
            Field::City => "city",
            Field::Brand => "brand",
            Field::Model => "model",
            Field::Condition => "condition",
            Field::Warranty => "warranty",
            Field::Bhk => "bhk",
            Field::Bedroom => "bedroom",
            Field::Bathroom => "bathroom",
            Field::Furnished => "furnished",
            Field::ConstructionStatus => "constructionStatus",
            Field::Bachelor => "bachelor",
            Field::WashRoom => "wash_room",
            Field::Maintenance => "maintenance",
            Field::SuperBuildArea => "superBuildArea",
            Field::CarpetArea => "carpetArea",
            Field::PlotArea => "plotArea",
            Field::Length => "length",
            Field::Breadth => "breadth",
            Field::FloorNumber => "floorNumber",
            Field::TotalFloor => "totalFloor",
            Field::BikeParking => "bikeParking",
            Field::CarParking => "carParking",
        }
    }

    /// Name the backend uses in payloads, records and validation errors
    pub fn backend_name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Price => "price",
            Field::State => "state_id",
            Field::District => "district_id",
            Field::City => "city_id",
            Field::Brand => "brand_id",
            Field::Model => "model_id",
            Field::Condition => "condition",
            Field::Warranty => "warranty",
            Field::Bhk => "bhk",
            Field::Bedroom => "bedroom",
            Field::Bathroom => "bathroom",
            Field::Furnished => "furnished",
            Field::ConstructionStatus => "construction_status",
            Field::Bachelor => "bachelor",
            Field::WashRoom => "wash_room",
            Field::Maintenance => "maintenance",
            Field::SuperBuildArea => "super_build_area",
            Field::CarpetArea => "carpet_area",
            Field::PlotArea => "plot_area",
            Field::Length => "length",
            Field::Breadth => "breadth",
            Field::FloorNumber => "floor_number",
            Field::TotalFloor => "total_floor",
            Field::BikeParking => "bike_parking",
            Field::CarParking => "car_parking",
        }
    }

    pub fn from_backend_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.backend_name() == name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::Price => "Price",
            Field::State => "State",
            Field::District => "District",
            Field::City => "City",
            Field::Brand => "Brand",
            Field::Model => "Model",
            Field::Condition => "Condition",
            Field::Warranty => "Warranty",
            Field::Bhk => "BHK",
            Field::Bedroom => "Bedrooms",
            Field::Bathroom => "Bathrooms",
            Field::Furnished => "Furnishing",
            Field::ConstructionStatus => "Construction status",
            Field::Bachelor => "Bachelors allowed",
            Field::WashRoom => "Washrooms",
            Field::Maintenance => "Maintenance",
            Field::SuperBuildArea => "Super built-up area",
            Field::CarpetArea => "Carpet area",
            Field::PlotArea => "Plot area",
            Field::Length => "Length",
            Field::Breadth => "Breadth",
            Field::FloorNumber => "Floor number",
            Field::TotalFloor => "Total floors",
            Field::BikeParking => "Bike parking",
            Field::CarParking => "Car parking",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Title => FieldKind::Text { min: 3, max: 100 },
            Field::Description => FieldKind::Text { min: 10, max: 4000 },
            Field::Warranty => FieldKind::Text { min: 0, max: 100 },
            Field::Price
            | Field::Maintenance
            | Field::SuperBuildArea
            | Field::CarpetArea
            | Field::PlotArea
            | Field::Length
            | Field::Breadth => FieldKind::Float,
            Field::Bhk
            | Field::Bedroom
            | Field::Bathroom
            | Field::WashRoom
            | Field::FloorNumber
            | Field::TotalFloor
            | Field::BikeParking
            | Field::CarParking => FieldKind::Integer,
            Field::Furnished => FieldKind::Choice(FURNISHED_CHOICES),
            Field::ConstructionStatus => FieldKind::Choice(CONSTRUCTION_STATUS_CHOICES),
            Field::Bachelor => FieldKind::Choice(BACHELOR_CHOICES),
            Field::Condition => FieldKind::Choice(CONDITION_CHOICES),
            Field::State | Field::District | Field::City | Field::Brand | Field::Model => FieldKind::Dropdown,
        }
    }

    pub fn is_common(&self) -> bool {
        Field::COMMON.contains(self)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind(), FieldKind::Float | FieldKind::Integer)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == value)
            .ok_or_else(|| anyhow::anyhow!("unknown form field '{}'", value))
    }
}
