//! Session-scoped observation collection.
//!
//! # Responsibility
//! - Hold the observations logged during one session, in insertion order.
//! - Model create/update as pure operations returning a new log.
//!
//! # Invariants
//! - Write paths call `validate()` before producing a new log.
//! - Ids are unique within a log; updates keep id and position.
//! - A log value is never mutated after construction.

use crate::model::observation::{
    ObservationFields, ObservationId, ObservationValidationError, TreeObservation,
};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LogResult<T> = Result<T, LogError>;

/// Error for observation log writes.
#[derive(Debug, Clone, PartialEq)]
pub enum LogError {
    Validation(ObservationValidationError),
    DuplicateId(ObservationId),
    NotFound(ObservationId),
}

impl Display for LogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "observation already logged: {id}"),
            Self::NotFound(id) => write!(f, "observation not found: {id}"),
        }
    }
}

impl Error for LogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateId(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<ObservationValidationError> for LogError {
    fn from(value: ObservationValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Ordered, immutable collection of observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationLog {
    entries: Vec<TreeObservation>,
}

impl ObservationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a log from existing entries, e.g. a shell-held snapshot.
    ///
    /// # Errors
    /// - `Validation` when any entry breaks record invariants.
    /// - `DuplicateId` when two entries share an id.
    pub fn from_entries(entries: Vec<TreeObservation>) -> LogResult<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.id) {
                return Err(LogError::DuplicateId(entry.id));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[TreeObservation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: ObservationId) -> Option<&TreeObservation> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Returns a new log with `observation` appended.
    pub fn create(&self, observation: TreeObservation) -> LogResult<Self> {
        observation.validate()?;
        if self.get(observation.id).is_some() {
            return Err(LogError::DuplicateId(observation.id));
        }

        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.extend_from_slice(&self.entries);
        entries.push(observation);
        Ok(Self { entries })
    }

    /// Returns a new log where the observation `id` carries `fields`.
    ///
    /// The updated entry keeps its id and its position in the log.
    pub fn update(&self, id: ObservationId, fields: ObservationFields) -> LogResult<Self> {
        fields.validate()?;
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(LogError::NotFound(id))?;

        let mut entries = self.entries.clone();
        entries[index] = entries[index].with_fields(fields);
        Ok(Self { entries })
    }

    pub fn summary(&self) -> LogSummary {
        LogSummary {
            data_points: self.entries.len(),
        }
    }
}

/// Collection status shown on the landing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSummary {
    pub data_points: usize,
}

impl LogSummary {
    pub fn is_empty(&self) -> bool {
        self.data_points == 0
    }
}

impl Display for LogSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.data_points {
            0 => write!(f, "You haven't added any data yet."),
            1 => write!(f, "You have 1 data point logged."),
            count => write!(f, "You have {count} data points logged."),
        }
    }
}
