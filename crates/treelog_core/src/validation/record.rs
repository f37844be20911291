//! Whole-record validation for the entry and edit forms.
//!
//! # Responsibility
//! - Hold raw form text for one candidate observation.
//! - Recompute the per-field error map from current values.
//! - Gate submission on all four fields being present and valid.

use crate::model::observation::{
    Location, ObservationFields, ObservationValidationError, TreeObservation,
};
use crate::validation::field::{
    check_field, parse_growth_stage, parse_latitude, parse_longitude, parse_tree_count,
    FieldError, FieldName,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw text of the four entry-form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRecord {
    pub tree_count: String,
    pub longitude: String,
    pub latitude: String,
    pub growth_stage: String,
}

impl CandidateRecord {
    pub fn new(
        tree_count: impl Into<String>,
        longitude: impl Into<String>,
        latitude: impl Into<String>,
        growth_stage: impl Into<String>,
    ) -> Self {
        Self {
            tree_count: tree_count.into(),
            longitude: longitude.into(),
            latitude: latitude.into(),
            growth_stage: growth_stage.into(),
        }
    }

    /// Prefills the edit form from an existing observation.
    pub fn from_observation(observation: &TreeObservation) -> Self {
        Self {
            tree_count: observation.tree_count.to_string(),
            longitude: observation.location.longitude.to_string(),
            latitude: observation.location.latitude.to_string(),
            growth_stage: observation.growth_stage.as_str().to_string(),
        }
    }

    pub fn value(&self, field: FieldName) -> &str {
        match field {
            FieldName::TreeCount => &self.tree_count,
            FieldName::Longitude => &self.longitude,
            FieldName::Latitude => &self.latitude,
            FieldName::GrowthStage => &self.growth_stage,
        }
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let slot = match field {
            FieldName::TreeCount => &mut self.tree_count,
            FieldName::Longitude => &mut self.longitude,
            FieldName::Latitude => &mut self.latitude,
            FieldName::GrowthStage => &mut self.growth_stage,
        };
        *slot = value.into();
    }

    /// Inline errors for the current values; untouched fields report none.
    pub fn field_errors(&self) -> RecordErrors {
        let mut errors = RecordErrors::default();
        for field in FieldName::ALL {
            let value = self.value(field);
            if value.is_empty() {
                continue;
            }
            if let Err(err) = check_field(field, value) {
                errors.insert(err);
            }
        }
        errors
    }

    /// Parses all four fields for submission.
    ///
    /// Empty fields count as errors here. On failure every offending field is
    /// reported, not only the first.
    pub fn parse(&self) -> Result<ObservationFields, RecordErrors> {
        let tree_count = parse_tree_count(&self.tree_count);
        let longitude = parse_longitude(&self.longitude);
        let latitude = parse_latitude(&self.latitude);
        let growth_stage = parse_growth_stage(&self.growth_stage);

        match (tree_count, longitude, latitude, growth_stage) {
            (Ok(tree_count), Ok(longitude), Ok(latitude), Ok(growth_stage)) => {
                Location::new(longitude, latitude)
                    .and_then(|location| {
                        ObservationFields::new(tree_count, location, growth_stage)
                    })
                    .map_err(|err| RecordErrors::single(field_error_for(&err)))
            }
            (tree_count, longitude, latitude, growth_stage) => {
                let mut errors = RecordErrors::default();
                for err in [
                    tree_count.err(),
                    longitude.err(),
                    latitude.err(),
                    growth_stage.err(),
                ]
                .into_iter()
                .flatten()
                {
                    errors.insert(err);
                }
                Err(errors)
            }
        }
    }
}

/// Maps a model invariant failure to the form field that caused it.
fn field_error_for(err: &ObservationValidationError) -> FieldError {
    match err {
        ObservationValidationError::LongitudeOutOfRange(_) => FieldError::LongitudeOutOfRange,
        ObservationValidationError::LatitudeOutOfRange(_) => FieldError::LatitudeOutOfRange,
        ObservationValidationError::UnknownGrowthStage(_) => FieldError::MissingGrowthStage,
        ObservationValidationError::ZeroTreeCount
        | ObservationValidationError::NilId
        | ObservationValidationError::MalformedLocation(_) => FieldError::InvalidTreeCount,
    }
}

/// Returns whether `record` may be submitted.
///
/// Requires every field to be non-empty and individually valid.
pub fn is_record_valid(record: &CandidateRecord) -> bool {
    record.parse().is_ok()
}

/// Per-field error map for one candidate record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordErrors {
    tree_count: Option<FieldError>,
    longitude: Option<FieldError>,
    latitude: Option<FieldError>,
    growth_stage: Option<FieldError>,
}

impl RecordErrors {
    fn slot(&mut self, field: FieldName) -> &mut Option<FieldError> {
        match field {
            FieldName::TreeCount => &mut self.tree_count,
            FieldName::Longitude => &mut self.longitude,
            FieldName::Latitude => &mut self.latitude,
            FieldName::GrowthStage => &mut self.growth_stage,
        }
    }

    fn single(error: FieldError) -> Self {
        let mut errors = Self::default();
        errors.insert(error);
        errors
    }

    fn insert(&mut self, error: FieldError) {
        *self.slot(error.field()) = Some(error);
    }

    pub fn get(&self, field: FieldName) -> Option<FieldError> {
        match field {
            FieldName::TreeCount => self.tree_count,
            FieldName::Longitude => self.longitude,
            FieldName::Latitude => self.latitude,
            FieldName::GrowthStage => self.growth_stage,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Flagged fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, FieldError)> + '_ {
        FieldName::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|err| (field, err)))
    }

    /// Comma-separated names of flagged fields, for log events.
    pub fn field_list(&self) -> String {
        self.iter()
            .map(|(field, _)| field.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Display for RecordErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .iter()
            .map(|(_, err)| err.message())
            .collect::<Vec<_>>();
        write!(f, "{}", messages.join(" "))
    }
}

impl Error for RecordErrors {}
