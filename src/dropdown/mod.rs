//! Reference-data dropdowns: the shared cache and option parsing

pub mod cache;
pub mod options;

pub use cache::{CacheEntry, DropdownCache, FetchMethod, cache_key};
pub use options::{DropdownOption, ReferenceList, options_from_payload};
