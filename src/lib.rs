pub mod api;
pub mod cascade;
pub mod config;
pub mod dropdown;
pub mod form;
pub mod listing;
pub mod session;
pub mod submission;

pub use session::Session;
