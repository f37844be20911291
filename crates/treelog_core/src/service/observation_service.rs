//! Observation use-case service.
//!
//! # Responsibility
//! - Provide the log, update and report flows the UI shell drives.
//! - Own the session's single authoritative [`ObservationLog`].
//!
//! # Invariants
//! - A submission is accepted only when every form field is present and
//!   valid.
//! - An edit that changes nothing is rejected even when its fields are valid.
//! - Report generation never mutates the log.

use crate::model::observation::{ObservationFields, ObservationId, TreeObservation};
use crate::report::filter::{filter, FilterCriteria};
use crate::repo::observation_log::{LogError, ObservationLog};
use crate::validation::criteria::{CriteriaErrors, CriteriaForm};
use crate::validation::record::{CandidateRecord, RecordErrors};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Confirmation shown after a new observation is logged.
pub const LOGGED_MESSAGE: &str = "Data logged successfully!";
/// Confirmation shown after an observation is updated.
pub const UPDATED_MESSAGE: &str = "Data updated successfully!";
/// Shown when an update is rejected for invalid input or a missing target.
pub const REJECTED_MESSAGE: &str = "Invalid data or no data selected!";
/// Shown when an edit is resubmitted without changes.
pub const UNCHANGED_MESSAGE: &str = "No changes to update.";

/// Error for log/update submissions.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// One or more form fields are missing or invalid.
    InvalidRecord(RecordErrors),
    /// Target observation does not exist.
    NotFound(ObservationId),
    /// Edit carries the same values as the stored observation.
    NoChanges(ObservationId),
    /// Log-level write failure.
    Log(LogError),
}

impl SubmitError {
    /// Message suitable for the shell's popup.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoChanges(_) => UNCHANGED_MESSAGE,
            Self::InvalidRecord(_) | Self::NotFound(_) | Self::Log(_) => REJECTED_MESSAGE,
        }
    }
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRecord(errors) => write!(f, "invalid observation: {errors}"),
            Self::NotFound(id) => write!(f, "observation not found: {id}"),
            Self::NoChanges(id) => write!(f, "observation {id} unchanged"),
            Self::Log(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRecord(errors) => Some(errors),
            Self::Log(err) => Some(err),
            Self::NotFound(_) | Self::NoChanges(_) => None,
        }
    }
}

impl From<LogError> for SubmitError {
    fn from(value: LogError) -> Self {
        match value {
            LogError::NotFound(id) => Self::NotFound(id),
            other => Self::Log(other),
        }
    }
}

/// Returns whether `fields` differ from what `existing` already stores.
pub fn has_changes(existing: &TreeObservation, fields: &ObservationFields) -> bool {
    existing.fields() != *fields
}

/// Use-case facade over the session observation log.
#[derive(Debug, Default)]
pub struct ObservationService {
    log: ObservationLog,
}

impl ObservationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing log, e.g. one restored by the shell.
    pub fn with_log(log: ObservationLog) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &ObservationLog {
        &self.log
    }

    pub fn into_log(self) -> ObservationLog {
        self.log
    }

    /// Logs a new observation from entry-form input.
    ///
    /// # Contract
    /// - All four fields must be present and valid.
    /// - The created observation gets a fresh stable id.
    pub fn log_observation(
        &mut self,
        candidate: &CandidateRecord,
    ) -> Result<TreeObservation, SubmitError> {
        let fields = candidate.parse().map_err(|errors| {
            warn!(
                "event=observation_log module=service status=rejected fields={}",
                errors.field_list()
            );
            SubmitError::InvalidRecord(errors)
        })?;

        let observation = TreeObservation::new(fields);
        self.log = self.log.create(observation.clone())?;
        info!(
            "event=observation_log module=service status=ok id={} total={}",
            observation.id,
            self.log.len()
        );
        Ok(observation)
    }

    /// Replaces the fields of an existing observation from edit-form input.
    ///
    /// # Contract
    /// - The candidate must be fully valid.
    /// - `id` must exist in the log.
    /// - At least one field must differ from the stored values.
    pub fn update_observation(
        &mut self,
        id: ObservationId,
        candidate: &CandidateRecord,
    ) -> Result<TreeObservation, SubmitError> {
        let fields = candidate.parse().map_err(|errors| {
            warn!(
                "event=observation_update module=service status=rejected id={} fields={}",
                id,
                errors.field_list()
            );
            SubmitError::InvalidRecord(errors)
        })?;

        let existing = self.log.get(id).ok_or_else(|| {
            warn!(
                "event=observation_update module=service status=not_found id={}",
                id
            );
            SubmitError::NotFound(id)
        })?;
        if !has_changes(existing, &fields) {
            debug!(
                "event=observation_update module=service status=unchanged id={}",
                id
            );
            return Err(SubmitError::NoChanges(id));
        }

        let updated = existing.with_fields(fields);
        self.log = self.log.update(id, fields)?;
        info!(
            "event=observation_update module=service status=ok id={}",
            id
        );
        Ok(updated)
    }

    /// Returns observations matching the report form, in log order.
    ///
    /// # Errors
    /// Returns the flagged fields when the form is invalid; no filtering is
    /// applied in that case.
    pub fn generate_report(
        &self,
        form: &CriteriaForm,
    ) -> Result<Vec<TreeObservation>, CriteriaErrors> {
        let criteria = form.to_criteria().map_err(|errors| {
            warn!(
                "event=report_generate module=service status=rejected fields={}",
                errors.field_list()
            );
            errors
        })?;
        Ok(self.report(&criteria))
    }

    /// Returns observations matching already-typed criteria.
    pub fn report(&self, criteria: &FilterCriteria) -> Vec<TreeObservation> {
        let matched = filter(self.log.entries(), criteria);
        debug!(
            "event=report_generate module=service status=ok matched={} total={} unconstrained={}",
            matched.len(),
            self.log.len(),
            criteria.is_unconstrained()
        );
        matched
    }

    /// Returns every logged observation.
    pub fn show_all(&self) -> Vec<TreeObservation> {
        self.report(&FilterCriteria::show_all())
    }
}
