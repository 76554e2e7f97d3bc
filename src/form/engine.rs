//! Form state engine
//!
//! Owns the [`FormSnapshot`] and the [`CascadeResolver`]. Every mutation goes
//! through here so the cascade, the derived plot area and the error map stay
//! consistent. Network work is left to the caller: mutations hand back the
//! [`LoadTicket`]s to run and [`FormEngine::commit_load`] takes the results.

use super::config::{CategoryConfig, CategoryKey};
use super::field::Field;
use super::snapshot::{FormSnapshot, MediaKind, MediaSelection};
use super::validation::{self, ValidationMessage};
use crate::cascade::{AxisKind, CascadeResolver, CommitOutcome, LoadTicket};
use crate::dropdown::DropdownOption;
use log::{debug, info};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Parents walked in cascade order when populating from a record
const POPULATE_ORDER: [Field; 3] = [Field::State, Field::District, Field::Brand];

#[derive(Debug, Clone, Default)]
struct AutoPopulate {
    outstanding: BTreeSet<u64>,
}

#[derive(Debug, Clone)]
pub struct FormEngine {
    config: CategoryConfig,
    snapshot: FormSnapshot,
    resolver: CascadeResolver,
    auto_populate: Option<AutoPopulate>,
}

impl FormEngine {
    pub fn new(config: CategoryConfig) -> Self {
        Self {
            config,
            snapshot: FormSnapshot::new(),
            resolver: CascadeResolver::new(),
            auto_populate: None,
        }
    }

    pub fn config(&self) -> &CategoryConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &FormSnapshot {
        &self.snapshot
    }

    pub fn resolver(&self) -> &CascadeResolver {
        &self.resolver
    }

    pub fn options(&self, axis: AxisKind) -> &[DropdownOption] {
        self.resolver.options(axis)
    }

    pub fn value(&self, field: Field) -> &str {
        self.snapshot.value(field)
    }

    pub fn is_auto_populating(&self) -> bool {
        self.auto_populate.is_some()
    }

    pub fn media_mut(&mut self) -> &mut MediaSelection {
        &mut self.snapshot.media
    }

    /// Set a value, clear its error and run the cascade.
    ///
    /// Returns the dependent loads the caller must run.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Vec<LoadTicket> {
        let value = value.into();
        let suppress = self.is_auto_populating();
        let change = self.resolver.parent_changed(field, &value, suppress);

        self.snapshot.set(field, value);
        self.snapshot.errors.remove(field.as_str());

        for cleared in &change.cleared {
            self.snapshot.clear(*cleared);
            self.snapshot.errors.remove(cleared.as_str());
        }

        if matches!(field, Field::Length | Field::Breadth) {
            self.recompute_plot_area();
        }

        if let Some(populate) = self.auto_populate.as_mut() {
            populate.outstanding.extend(change.loads.iter().map(|t| t.id));
        }
        change.loads
    }

    fn recompute_plot_area(&mut self) {
        if self.config.category != Some(CategoryKey::LandsPlots) {
            return;
        }
        let length = self.snapshot.value(Field::Length).to_string();
        let breadth = self.snapshot.value(Field::Breadth).to_string();

        // Zero or unparsable dimensions leave the area empty
        match validation::derive_plot_area(&length, &breadth) {
            Some(area) => {
                self.snapshot.set(Field::PlotArea, area);
                self.snapshot.errors.remove(Field::PlotArea.as_str());
            }
            None => self.snapshot.clear(Field::PlotArea),
        }
    }

    /// Validate one field and record the outcome in the error map
    pub fn validate_field(&mut self, field: Field) -> Result<(), ValidationMessage> {
        let result = validation::validate_field(&self.snapshot, &self.config, field);
        match &result {
            Ok(()) => {
                self.snapshot.errors.remove(field.as_str());
            }
            Err(message) => {
                self.snapshot.errors.insert(field.as_str().to_string(), message.clone());
            }
        }
        result
    }

    pub fn blur_field(&mut self, field: Field) -> Result<(), ValidationMessage> {
        self.snapshot.touched.insert(field);
        self.validate_field(field)
    }

    pub fn focus(&mut self, field: Field) {
        self.snapshot.focused_field = Some(field);
    }

    /// Full-form validation run before submit.
    ///
    /// On failure every visible field is marked touched, the error map is
    /// replaced and focus moves to the first invalid field.
    pub fn validate_all(&mut self) -> Result<(), BTreeMap<Field, ValidationMessage>> {
        let errors = validation::validate_all(&self.snapshot, &self.config);
        if errors.is_empty() {
            self.snapshot.errors.clear();
            return Ok(());
        }

        self.snapshot.touched.extend(self.config.visible_fields());
        self.snapshot.errors = errors
            .iter()
            .map(|(field, message)| (field.as_str().to_string(), message.clone()))
            .collect();
        self.snapshot.focused_field = errors.keys().next().copied();
        debug!("Form has {} invalid fields", errors.len());
        Err(errors)
    }

    /// Replace the snapshot with `record` and start the dependent loads.
    ///
    /// Accepts backend or UI field names, optionally wrapped in `data`.
    /// Child values are kept while the returned loads are outstanding.
    pub fn begin_auto_populate(&mut self, record: &Value) -> Vec<LoadTicket> {
        let record = match record.get("data") {
            Some(data) if data.is_object() => data,
            _ => record,
        };

        let mut snapshot = FormSnapshot::new();
        if let Some(map) = record.as_object() {
            for (key, value) in map {
                let field = Field::from_backend_name(key).or_else(|| key.parse::<Field>().ok());
                if let (Some(field), Some(text)) = (field, value_text(value)) {
                    snapshot.set(field, text);
                }
            }
            snapshot.record_id = map.get("id").and_then(value_text);
        }
        populate_media(&mut snapshot.media, record);

        self.snapshot = snapshot;
        self.resolver.reset_all();
        self.auto_populate = Some(AutoPopulate::default());

        let mut loads = Vec::new();
        for parent in POPULATE_ORDER {
            let value = self.snapshot.value(parent).to_string();
            if !value.is_empty() {
                loads.extend(self.set_field(parent, value));
            }
        }

        if loads.is_empty() {
            self.auto_populate = None;
        }
        info!("Auto-populating form with {} dependent loads", loads.len());
        loads
    }

    /// Apply a finished dependent load
    pub fn commit_load(&mut self, ticket: &LoadTicket, result: Result<Vec<DropdownOption>, String>) -> CommitOutcome {
        let outcome = self.resolver.commit(ticket, result);

        let settled = match self.auto_populate.as_mut() {
            Some(populate) => {
                populate.outstanding.remove(&ticket.id);
                populate.outstanding.is_empty()
            }
            None => false,
        };
        if settled {
            debug!("All auto-populate loads settled");
            self.auto_populate = None;
        }
        outcome
    }

    /// Fresh snapshot, idle axes, no populate in progress
    pub fn reset(&mut self) {
        self.snapshot = FormSnapshot::new();
        self.resolver.reset_all();
        self.auto_populate = None;
    }

    /// Merge field errors reported by the backend and focus the first known field
    pub fn merge_server_errors(&mut self, errors: &BTreeMap<String, String>) {
        self.snapshot
            .errors
            .extend(errors.iter().map(|(k, v)| (k.clone(), v.clone())));
        let first = Field::ALL
            .into_iter()
            .find(|field| errors.contains_key(field.as_str()));
        if first.is_some() {
            self.snapshot.focused_field = first;
        }
    }

    pub fn set_api_error(&mut self, message: Option<String>) {
        self.snapshot.api_error = message;
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("yes".to_string()),
        Value::Bool(false) => Some("no".to_string()),
        // Related records such as `{"state": {"id": 4, ...}}`
        Value::Object(map) => map.get("id").and_then(value_text),
        _ => None,
    }
}

fn populate_media(media: &mut MediaSelection, record: &Value) {
    for kind in [MediaKind::Image, MediaKind::Video] {
        let Some(items) = record.get(kind.part_name()).and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            match item {
                Value::Object(map) => {
                    if let Some(id) = map.get("id").and_then(value_text) {
                        let url = map.get("url").and_then(Value::as_str).map(str::to_string);
                        media.add_existing(kind, id, url);
                    }
                }
                other => {
                    if let Some(id) = value_text(other) {
                        media.add_existing(kind, id, None);
                    }
                }
            }
        }
    }
}
