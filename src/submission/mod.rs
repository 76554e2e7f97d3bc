//! Listing submission: multipart payload, routing and error classification

pub mod adapter;
pub mod mapping;
pub mod payload;

pub use adapter::{SubmissionError, SubmissionKind, SubmissionOutcome, submit};
pub use mapping::{error_message, frontend_name, map_errors};
pub use payload::build_payload;
