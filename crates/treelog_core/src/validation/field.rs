//! Per-field validation for the observation entry form.
//!
//! # Responsibility
//! - Parse raw form text into typed field values.
//! - Map every rejection to the field's user-facing message.
//!
//! # Invariants
//! - Un-parseable input is reported as `Invalid`, never as a parse failure.
//! - [`validate`] treats an untouched (empty) field as not yet an error;
//!   [`check_field`] treats it as missing.
//! - Whitespace-only input counts as typed: it is `Invalid` here, unlike the
//!   report filter form where a blank bound means "no constraint".

use crate::model::literal::{parse_decimal, parse_unsigned, Unsigned};
use crate::model::observation::{is_valid_latitude, is_valid_longitude, GrowthStage};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Entry-form field identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    TreeCount,
    Longitude,
    Latitude,
    GrowthStage,
}

impl FieldName {
    /// All fields in form order.
    pub const ALL: [FieldName; 4] = [
        Self::TreeCount,
        Self::Longitude,
        Self::Latitude,
        Self::GrowthStage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TreeCount => "tree_count",
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
            Self::GrowthStage => "growth_stage",
        }
    }
}

impl Display for FieldName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name that is not part of the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldError(pub String);

impl Display for UnknownFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown field `{}`", self.0)
    }
}

impl Error for UnknownFieldError {}

impl FromStr for FieldName {
    type Err = UnknownFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "tree_count" | "treeCount" | "numTrees" => Ok(Self::TreeCount),
            "longitude" => Ok(Self::Longitude),
            "latitude" => Ok(Self::Latitude),
            "growth_stage" | "growthStage" => Ok(Self::GrowthStage),
            other => Err(UnknownFieldError(other.to_string())),
        }
    }
}

/// Rejection reason for one entry-form field.
///
/// `Display` renders the message shown next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    InvalidTreeCount,
    /// Whole number above the largest storable count.
    TreeCountTooLarge,
    LongitudeOutOfRange,
    LatitudeOutOfRange,
    MissingGrowthStage,
}

impl FieldError {
    /// Returns the field this error belongs to.
    pub fn field(self) -> FieldName {
        match self {
            Self::InvalidTreeCount | Self::TreeCountTooLarge => FieldName::TreeCount,
            Self::LongitudeOutOfRange => FieldName::Longitude,
            Self::LatitudeOutOfRange => FieldName::Latitude,
            Self::MissingGrowthStage => FieldName::GrowthStage,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidTreeCount => "Please enter a valid number greater than 0.",
            Self::TreeCountTooLarge => "Number of trees is too large.",
            Self::LongitudeOutOfRange => "Longitude must be between -180 and 180.",
            Self::LatitudeOutOfRange => "Latitude must be between -90 and 90.",
            Self::MissingGrowthStage => "Please select a growth stage.",
        }
    }

    /// Standard rejection for `field`.
    pub fn for_field(field: FieldName) -> Self {
        match field {
            FieldName::TreeCount => Self::InvalidTreeCount,
            FieldName::Longitude => Self::LongitudeOutOfRange,
            FieldName::Latitude => Self::LatitudeOutOfRange,
            FieldName::GrowthStage => Self::MissingGrowthStage,
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for FieldError {}

/// Outcome of validating one input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn invalid(reason: impl Display) -> Self {
        Self::Invalid(reason.to_string())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Message to display, or `None` when valid.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason.as_str()),
        }
    }
}

impl<E: Display> From<Option<E>> for ValidationResult {
    fn from(value: Option<E>) -> Self {
        match value {
            Some(err) => Self::invalid(err),
            None => Self::Valid,
        }
    }
}

/// Parses a tree count: a whole number greater than 0.
///
/// Counts above `u64::MAX` are reported as `TreeCountTooLarge`.
pub fn parse_tree_count(raw: &str) -> Result<u64, FieldError> {
    match parse_unsigned(raw) {
        Some(Unsigned::Value(count)) if count > 0 => Ok(count),
        Some(Unsigned::Overflow) => Err(FieldError::TreeCountTooLarge),
        _ => Err(FieldError::InvalidTreeCount),
    }
}

/// Parses a longitude in decimal degrees within [-180, 180].
pub fn parse_longitude(raw: &str) -> Result<f64, FieldError> {
    parse_decimal(raw)
        .filter(|value| is_valid_longitude(*value))
        .ok_or(FieldError::LongitudeOutOfRange)
}

/// Parses a latitude in decimal degrees within [-90, 90].
pub fn parse_latitude(raw: &str) -> Result<f64, FieldError> {
    parse_decimal(raw)
        .filter(|value| is_valid_latitude(*value))
        .ok_or(FieldError::LatitudeOutOfRange)
}

/// Parses one of the growth stage form values.
pub fn parse_growth_stage(raw: &str) -> Result<GrowthStage, FieldError> {
    raw.parse::<GrowthStage>()
        .map_err(|_| FieldError::MissingGrowthStage)
}

/// Strict check used for submission: empty input is an error.
pub fn check_field(field: FieldName, raw: &str) -> Result<(), FieldError> {
    match field {
        FieldName::TreeCount => parse_tree_count(raw).map(|_| ()),
        FieldName::Longitude => parse_longitude(raw).map(|_| ()),
        FieldName::Latitude => parse_latitude(raw).map(|_| ()),
        FieldName::GrowthStage => parse_growth_stage(raw).map(|_| ()),
    }
}

/// Incremental check run on every keystroke.
///
/// An empty value is `Valid` so a fresh form shows no errors; use
/// [`crate::validation::record::is_record_valid`] to gate submission.
pub fn validate(field: FieldName, raw: &str) -> ValidationResult {
    if raw.is_empty() {
        return ValidationResult::Valid;
    }
    check_field(field, raw).err().into()
}
