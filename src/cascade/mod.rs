//! Cascading dropdown resolution
//!
//! State drives district, district drives city, brand drives model. The
//! resolver is the only writer of the option sets; the form engine feeds it
//! parent values and applies the child clears it reports back.

pub mod axis;
pub mod resolver;

pub use axis::{AxisKind, AxisState, CommitOutcome, DependentOptionSet, LoadTicket};
pub use resolver::{CascadeResolver, ParentChange};
