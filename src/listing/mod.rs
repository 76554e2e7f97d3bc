//! Listing feeds, status rules and deletion

pub mod delete;
pub mod feed;
pub mod status;
pub mod throttle;

pub use delete::{ConfirmedDelete, DeleteRequest};
pub use feed::{FeedFilters, ListingFeed, PageRequest};
pub use status::{Listing, ListingStatus, NavigationBlock};
pub use throttle::{ScrollGate, ScrollGateConfig, ScrollGateStats};
