//! Upload forms: field vocabulary, category table, state and validation

pub mod config;
pub mod engine;
pub mod field;
pub mod mode;
pub mod session;
pub mod snapshot;
pub mod validation;

pub use config::{CategoryConfig, CategoryKey};
pub use engine::FormEngine;
pub use field::{Field, FieldKind};
pub use mode::FormMode;
pub use session::{FormSession, load_dependents};
pub use snapshot::{FormSnapshot, MediaFile, MediaItem, MediaKind, MediaSelection};
pub use validation::ValidationMessage;
