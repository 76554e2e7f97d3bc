//! Dependent option axes
//!
//! An axis is one parent -> child dropdown relation. Each axis owns a
//! [`DependentOptionSet`] whose `generation` advances on every reset, so a
//! [`LoadTicket`] issued before the reset can no longer commit.

use crate::api::constants;
use crate::dropdown::{DropdownOption, FetchMethod};
use crate::form::field::Field;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxisKind {
    /// District given state
    District,
    /// City given district
    City,
    /// Model given brand
    Model,
}

impl AxisKind {
    pub const ALL: [AxisKind; 3] = [AxisKind::District, AxisKind::City, AxisKind::Model];

    pub fn parent_field(&self) -> Field {
        match self {
            AxisKind::District => Field::State,
            AxisKind::City => Field::District,
            AxisKind::Model => Field::Brand,
        }
    }

    pub fn child_field(&self) -> Field {
        match self {
            AxisKind::District => Field::District,
            AxisKind::City => Field::City,
            AxisKind::Model => Field::Model,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            AxisKind::District => constants::DISTRICTS_ENDPOINT,
            AxisKind::City => constants::CITIES_ENDPOINT,
            AxisKind::Model => constants::MODELS_ENDPOINT,
        }
    }

    pub fn fetch_method(&self) -> FetchMethod {
        match self {
            AxisKind::District | AxisKind::Model => FetchMethod::Get,
            AxisKind::City => FetchMethod::Post,
        }
    }

    pub fn param_name(&self) -> &'static str {
        match self {
            AxisKind::District => "state_id",
            AxisKind::City => "district_id",
            AxisKind::Model => "brand_id",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            AxisKind::District => "district_name",
            AxisKind::City => "city_name",
            AxisKind::Model => "model_name",
        }
    }

    pub fn params(&self, parent: &str) -> BTreeMap<String, String> {
        BTreeMap::from([(self.param_name().to_string(), parent.to_string())])
    }

    /// The axis whose parent is this axis's child
    pub fn downstream(&self) -> Option<AxisKind> {
        match self {
            AxisKind::District => Some(AxisKind::City),
            AxisKind::City | AxisKind::Model => None,
        }
    }

    /// The axis a change to `field` drives, if any
    pub fn driven_by(field: Field) -> Option<AxisKind> {
        AxisKind::ALL.into_iter().find(|axis| axis.parent_field() == field)
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.child_field().as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AxisState {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Identifies one dependent load; only the latest ticket per axis may commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub id: u64,
    pub axis: AxisKind,
    pub parent: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    Failed,
    /// Parent or generation moved on; result dropped
    Stale,
}

#[derive(Debug, Clone)]
pub struct DependentOptionSet {
    pub kind: AxisKind,
    pub parent_key: Option<String>,
    pub options: Vec<DropdownOption>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub state: AxisState,
    pub generation: u64,
}

impl DependentOptionSet {
    pub fn new(kind: AxisKind) -> Self {
        Self {
            kind,
            parent_key: None,
            options: Vec::new(),
            loaded_at: None,
            state: AxisState::Idle,
            generation: 0,
        }
    }

    /// Discard options and return to Idle; outstanding tickets go stale
    pub fn reset(&mut self) {
        self.parent_key = None;
        self.options.clear();
        self.loaded_at = None;
        self.state = AxisState::Idle;
        self.generation += 1;
    }

    /// Reset, then start loading for `parent`
    pub fn begin(&mut self, parent: &str, ticket_id: u64) -> LoadTicket {
        self.reset();
        self.parent_key = Some(parent.to_string());
        self.state = AxisState::Loading;
        LoadTicket {
            id: ticket_id,
            axis: self.kind,
            parent: parent.to_string(),
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.axis == self.kind
            && ticket.generation == self.generation
            && self.parent_key.as_deref() == Some(ticket.parent.as_str())
    }

    pub fn commit(&mut self, ticket: &LoadTicket, result: Result<Vec<DropdownOption>, String>) -> CommitOutcome {
        if !self.is_current(ticket) {
            return CommitOutcome::Stale;
        }
        match result {
            Ok(options) => {
                self.options = options;
                self.loaded_at = Some(Utc::now());
                self.state = AxisState::Ready;
                CommitOutcome::Applied
            }
            Err(message) => {
                self.options.clear();
                self.state = AxisState::Error(message);
                CommitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_wiring() {
        assert_eq!(AxisKind::driven_by(Field::State), Some(AxisKind::District));
        assert_eq!(AxisKind::driven_by(Field::District), Some(AxisKind::City));
        assert_eq!(AxisKind::driven_by(Field::Brand), Some(AxisKind::Model));
        assert_eq!(AxisKind::driven_by(Field::City), None);
        assert_eq!(AxisKind::City.fetch_method(), FetchMethod::Post);
        assert_eq!(AxisKind::District.params("7").get("state_id").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_commit_rejects_old_generation() {
        let mut set = DependentOptionSet::new(AxisKind::District);
        let old = set.begin("1", 1);
        let new = set.begin("1", 2);

        assert_eq!(set.commit(&old, Ok(vec![DropdownOption::new("a", "A")])), CommitOutcome::Stale);
        assert_eq!(set.state, AxisState::Loading);

        assert_eq!(set.commit(&new, Ok(vec![DropdownOption::new("b", "B")])), CommitOutcome::Applied);
        assert_eq!(set.state, AxisState::Ready);
        assert_eq!(set.options[0].id, "b");
        assert!(set.loaded_at.is_some());
    }

    #[test]
    fn test_failed_load_sets_error_state() {
        let mut set = DependentOptionSet::new(AxisKind::Model);
        let ticket = set.begin("samsung", 1);
        assert_eq!(set.commit(&ticket, Err("timeout".into())), CommitOutcome::Failed);
        assert_eq!(set.state, AxisState::Error("timeout".into()));
    }

    #[test]
    fn test_reset_invalidates_ticket() {
        let mut set = DependentOptionSet::new(AxisKind::City);
        let ticket = set.begin("4", 1);
        set.reset();
        assert!(!set.is_current(&ticket));
        assert_eq!(set.state, AxisState::Idle);
    }
}
