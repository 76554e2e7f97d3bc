//! A form bound to the backend
//!
//! [`FormSession`] pairs a [`FormEngine`] with the API client and the shared
//! dropdown cache, running the dependent loads the engine asks for and routing
//! submission outcomes back into the snapshot.

use super::config::CategoryConfig;
use super::engine::FormEngine;
use super::field::Field;
use super::mode::FormMode;
use crate::api::client::ApiClient;
use crate::api::constants;
use crate::api::error::ApiError;
use crate::cascade::{AxisKind, CommitOutcome, LoadTicket};
use crate::dropdown::{DropdownCache, DropdownOption, ReferenceList, options_from_payload};
use crate::submission::{self, SubmissionError, SubmissionOutcome};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use std::sync::Arc;

/// Options of `axis` for the given parent value
pub async fn load_dependents(
    client: &ApiClient,
    cache: &DropdownCache,
    axis: AxisKind,
    parent: &str,
) -> Result<Vec<DropdownOption>, ApiError> {
    let payload = cache
        .fetch(client, axis.endpoint(), &axis.params(parent), axis.fetch_method())
        .await?;
    Ok(options_from_payload(&payload, Some(axis.label_key())))
}

pub struct FormSession {
    engine: FormEngine,
    client: ApiClient,
    cache: Arc<DropdownCache>,
    mode: FormMode,
}

impl FormSession {
    pub fn new(config: CategoryConfig, client: ApiClient, cache: Arc<DropdownCache>) -> Self {
        Self {
            engine: FormEngine::new(config),
            client,
            cache,
            mode: FormMode::Create,
        }
    }

    pub fn engine(&self) -> &FormEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FormEngine {
        &mut self.engine
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn set_mode(&mut self, mode: FormMode) {
        self.mode = mode;
    }

    /// Fetch options for `ticket` without committing them
    pub async fn fetch(&self, ticket: &LoadTicket) -> Result<Vec<DropdownOption>, ApiError> {
        load_dependents(&self.client, &self.cache, ticket.axis, &ticket.parent).await
    }

    /// Run `tickets` concurrently and commit each result as it arrives
    pub async fn run_loads(&mut self, tickets: Vec<LoadTicket>) -> Vec<CommitOutcome> {
        let mut pending: FuturesUnordered<_> = tickets
            .into_iter()
            .map(|ticket| {
                let client = self.client.clone();
                let cache = self.cache.clone();
                async move {
                    let result = load_dependents(&client, &cache, ticket.axis, &ticket.parent).await;
                    (ticket, result)
                }
            })
            .collect();

        let mut outcomes = Vec::new();
        while let Some((ticket, result)) = pending.next().await {
            if let Err(e) = &result {
                warn!("Loading {} for parent {} failed: {}", ticket.axis, ticket.parent, e);
            }
            outcomes.push(self.engine.commit_load(&ticket, result.map_err(|e| e.to_string())));
        }
        outcomes
    }

    /// Set a field and load whatever depends on it
    pub async fn select(&mut self, field: Field, value: impl Into<String>) -> Vec<CommitOutcome> {
        let tickets = self.engine.set_field(field, value);
        self.run_loads(tickets).await
    }

    /// Options for the top of a chain (states, brands)
    pub async fn reference_options(&self, list: &ReferenceList) -> Result<Vec<DropdownOption>, ApiError> {
        let payload = self
            .cache
            .fetch(&self.client, list.endpoint(), &list.params(), list.method())
            .await?;
        Ok(options_from_payload(&payload, Some(list.label_key())))
    }

    /// Fill the form from an existing record and wait for every dependent load
    pub async fn auto_populate(&mut self, record: &serde_json::Value) -> Vec<CommitOutcome> {
        let tickets = self.engine.begin_auto_populate(record);
        self.run_loads(tickets).await
    }

    /// Fetch a listing and switch the form into edit mode
    pub async fn load_record(&mut self, record_id: &str) -> Result<(), ApiError> {
        let record = self
            .client
            .get_json(&constants::listing_endpoint(record_id), Vec::new())
            .await?;
        info!("Loaded listing {} for editing", record_id);
        self.mode = FormMode::Edit {
            record_id: record_id.to_string(),
        };
        self.auto_populate(&record).await;
        Ok(())
    }

    /// Validate, then submit. Failures land in the snapshot's error map or banner.
    pub async fn submit(&mut self) -> Result<SubmissionOutcome, SubmissionError> {
        if let Err(errors) = self.engine.validate_all() {
            return Err(SubmissionError::Invalid(errors));
        }
        self.engine.set_api_error(None);

        let result = submission::submit(
            &self.client,
            self.engine.snapshot(),
            self.engine.config(),
            &self.mode,
        )
        .await;

        match result {
            Ok(outcome) => {
                debug!("Submission accepted, resetting form");
                self.engine.reset();
                self.mode = FormMode::Create;
                Ok(outcome)
            }
            Err(error) => {
                self.apply_submission_error(&error);
                Err(error)
            }
        }
    }

    fn apply_submission_error(&mut self, error: &SubmissionError) {
        match error {
            SubmissionError::ServerValidation { errors, .. } if !errors.is_empty() => {
                self.engine.merge_server_errors(errors);
                self.engine.set_api_error(Some(error.to_string()));
            }
            SubmissionError::Invalid(_) => {}
            other => self.engine.set_api_error(Some(other.to_string())),
        }
    }
}
