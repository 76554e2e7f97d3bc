use super::axis::{AxisKind, AxisState, CommitOutcome, DependentOptionSet, LoadTicket};
use crate::dropdown::DropdownOption;
use crate::form::field::Field;
use log::debug;
use std::collections::BTreeMap;

/// What a parent value change requires of the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentChange {
    /// Loads to run, in the order they were issued
    pub loads: Vec<LoadTicket>,
    /// Child fields whose values must be cleared
    pub cleared: Vec<Field>,
}

impl ParentChange {
    pub fn is_empty(&self) -> bool {
        self.loads.is_empty() && self.cleared.is_empty()
    }
}

/// Owner of every dependent option set
#[derive(Debug, Clone)]
pub struct CascadeResolver {
    axes: BTreeMap<AxisKind, DependentOptionSet>,
    next_ticket: u64,
}

impl Default for CascadeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CascadeResolver {
    pub fn new() -> Self {
        Self {
            axes: AxisKind::ALL
                .into_iter()
                .map(|kind| (kind, DependentOptionSet::new(kind)))
                .collect(),
            next_ticket: 1,
        }
    }

    fn axis_mut(&mut self, kind: AxisKind) -> &mut DependentOptionSet {
        self.axes.entry(kind).or_insert_with(|| DependentOptionSet::new(kind))
    }

    pub fn axis(&self, kind: AxisKind) -> Option<&DependentOptionSet> {
        self.axes.get(&kind)
    }

    pub fn state(&self, kind: AxisKind) -> AxisState {
        self.axes.get(&kind).map(|a| a.state.clone()).unwrap_or_default()
    }

    pub fn options(&self, kind: AxisKind) -> &[DropdownOption] {
        self.axes.get(&kind).map(|a| a.options.as_slice()).unwrap_or(&[])
    }

    /// React to `field` taking `value`.
    ///
    /// With `suppress_clear` the child values stay put (bulk populate); the
    /// axes are still reset and reloaded.
    pub fn parent_changed(&mut self, field: Field, value: &str, suppress_clear: bool) -> ParentChange {
        let mut change = ParentChange::default();
        let Some(kind) = AxisKind::driven_by(field) else {
            return change;
        };
        let value = value.trim();

        {
            let axis = self.axis_mut(kind);
            let unchanged = axis.parent_key.as_deref() == Some(value);
            if unchanged && matches!(axis.state, AxisState::Loading | AxisState::Ready) {
                return change;
            }
        }

        self.reset_downstream(kind, suppress_clear, &mut change);

        if value.is_empty() {
            debug!("Parent of {} cleared, axis idle", kind);
            self.axis_mut(kind).reset();
            return change;
        }

        let id = self.next_ticket;
        self.next_ticket += 1;
        let ticket = self.axis_mut(kind).begin(value, id);
        debug!("Loading {} for parent {} (ticket {})", kind, value, ticket.id);
        change.loads.push(ticket);
        change
    }

    /// Clear the child of `kind` and every axis below it
    fn reset_downstream(&mut self, kind: AxisKind, suppress_clear: bool, change: &mut ParentChange) {
        if !suppress_clear {
            change.cleared.push(kind.child_field());
        }
        let mut next = kind.downstream();
        while let Some(below) = next {
            self.axis_mut(below).reset();
            if !suppress_clear {
                change.cleared.push(below.child_field());
            }
            next = below.downstream();
        }
    }

    /// Apply a finished load. Results for superseded tickets are dropped.
    pub fn commit(&mut self, ticket: &LoadTicket, result: Result<Vec<DropdownOption>, String>) -> CommitOutcome {
        let outcome = self.axis_mut(ticket.axis).commit(ticket, result);
        if outcome == CommitOutcome::Stale {
            debug!(
                "Discarding stale {} options for parent {} (ticket {})",
                ticket.axis, ticket.parent, ticket.id
            );
        }
        outcome
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.axes.get(&ticket.axis).is_some_and(|a| a.is_current(ticket))
    }

    pub fn reset_all(&mut self) {
        for axis in self.axes.values_mut() {
            axis.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(ids: &[&str]) -> Vec<DropdownOption> {
        ids.iter().map(|id| DropdownOption::new(*id, *id)).collect()
    }

    #[test]
    fn test_state_change_clears_district_and_city() {
        let mut resolver = CascadeResolver::new();
        let change = resolver.parent_changed(Field::State, "1", false);
        assert_eq!(change.cleared, vec![Field::District, Field::City]);
        assert_eq!(change.loads.len(), 1);
        assert_eq!(change.loads[0].axis, AxisKind::District);
        assert_eq!(resolver.state(AxisKind::District), AxisState::Loading);
        assert_eq!(resolver.state(AxisKind::City), AxisState::Idle);
    }

    #[test]
    fn test_empty_parent_goes_idle_without_load() {
        let mut resolver = CascadeResolver::new();
        let ticket = resolver.parent_changed(Field::State, "1", false).loads.remove(0);
        resolver.commit(&ticket, Ok(opts(&["10"])));

        let change = resolver.parent_changed(Field::State, "", false);
        assert!(change.loads.is_empty());
        assert_eq!(change.cleared, vec![Field::District, Field::City]);
        assert_eq!(resolver.state(AxisKind::District), AxisState::Idle);
        assert!(resolver.options(AxisKind::District).is_empty());
    }

    #[test]
    fn test_same_parent_is_noop() {
        let mut resolver = CascadeResolver::new();
        resolver.parent_changed(Field::Brand, "apple", false);
        assert!(resolver.parent_changed(Field::Brand, "apple", false).is_empty());
    }

    #[test]
    fn test_last_parent_wins() {
        let mut resolver = CascadeResolver::new();
        let first = resolver.parent_changed(Field::State, "1", false).loads.remove(0);
        let second = resolver.parent_changed(Field::State, "2", false).loads.remove(0);

        assert_eq!(resolver.commit(&second, Ok(opts(&["20"]))), CommitOutcome::Applied);
        assert_eq!(resolver.commit(&first, Ok(opts(&["10"]))), CommitOutcome::Stale);
        assert_eq!(resolver.options(AxisKind::District), opts(&["20"]).as_slice());
    }

    #[test]
    fn test_suppressed_change_still_reloads() {
        let mut resolver = CascadeResolver::new();
        let change = resolver.parent_changed(Field::State, "1", true);
        assert!(change.cleared.is_empty());
        assert_eq!(change.loads.len(), 1);
    }

    #[test]
    fn test_non_parent_field_is_ignored() {
        let mut resolver = CascadeResolver::new();
        assert!(resolver.parent_changed(Field::City, "9", false).is_empty());
        assert!(resolver.parent_changed(Field::Title, "x", false).is_empty());
    }
}
