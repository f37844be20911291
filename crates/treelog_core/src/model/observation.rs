//! Tree observation record.
//!
//! # Responsibility
//! - Define the record logged for one planting (count, location, stage).
//! - Enforce record invariants on construction and on deserialization.
//!
//! # Invariants
//! - `id` is stable and never nil.
//! - `tree_count > 0`.
//! - `longitude` is finite and within [-180, 180].
//! - `latitude` is finite and within [-90, 90].

use crate::model::literal::parse_decimal;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Lower longitude bound, inclusive.
pub const MIN_LONGITUDE: f64 = -180.0;
/// Upper longitude bound, inclusive.
pub const MAX_LONGITUDE: f64 = 180.0;
/// Lower latitude bound, inclusive.
pub const MIN_LATITUDE: f64 = -90.0;
/// Upper latitude bound, inclusive.
pub const MAX_LATITUDE: f64 = 90.0;

static LOCATION_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^,\s]+)\s*,\s*([^,\s]+)\s*$").expect("valid location pair regex")
});

/// Stable identifier assigned to an observation at creation.
pub type ObservationId = Uuid;

/// Lifecycle phase of a planted tree cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    Seedling,
    Sapling,
    Mature,
}

impl GrowthStage {
    /// All stages in form display order.
    pub const ALL: [GrowthStage; 3] = [Self::Seedling, Self::Sapling, Self::Mature];

    /// Wire/form value for this stage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seedling => "seedling",
            Self::Sapling => "sapling",
            Self::Mature => "mature",
        }
    }
}

impl Display for GrowthStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrowthStage {
    type Err = ObservationValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "seedling" => Ok(Self::Seedling),
            "sapling" => Ok(Self::Sapling),
            "mature" => Ok(Self::Mature),
            _ => Err(ObservationValidationError::UnknownGrowthStage(
                value.to_string(),
            )),
        }
    }
}

/// Structural errors for observation values.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservationValidationError {
    NilId,
    ZeroTreeCount,
    LongitudeOutOfRange(f64),
    LatitudeOutOfRange(f64),
    UnknownGrowthStage(String),
    /// Free-text `lon, lat` pair that does not hold two decimal numbers.
    MalformedLocation(String),
}

impl Display for ObservationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "observation id must not be nil"),
            Self::ZeroTreeCount => write!(f, "tree_count must be greater than 0"),
            Self::LongitudeOutOfRange(value) => write!(
                f,
                "longitude ({value}) must be within [{MIN_LONGITUDE}, {MAX_LONGITUDE}]"
            ),
            Self::LatitudeOutOfRange(value) => write!(
                f,
                "latitude ({value}) must be within [{MIN_LATITUDE}, {MAX_LATITUDE}]"
            ),
            Self::UnknownGrowthStage(value) => write!(
                f,
                "unknown growth stage `{value}`; expected seedling|sapling|mature"
            ),
            Self::MalformedLocation(value) => {
                write!(f, "location `{value}` is not a `longitude, latitude` pair")
            }
        }
    }
}

impl Error for ObservationValidationError {}

/// Geographic position of an observation, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LocationWire")]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Deserialize)]
struct LocationWire {
    longitude: f64,
    latitude: f64,
}

impl TryFrom<LocationWire> for Location {
    type Error = ObservationValidationError;

    fn try_from(value: LocationWire) -> Result<Self, Self::Error> {
        Self::new(value.longitude, value.latitude)
    }
}

impl Location {
    /// Builds a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, ObservationValidationError> {
        let location = Self {
            longitude,
            latitude,
        };
        location.validate()?;
        Ok(location)
    }

    /// Parses a free-text `"longitude, latitude"` pair.
    ///
    /// Both halves must be plain decimal literals; anything else is reported
    /// as `MalformedLocation` rather than producing a NaN coordinate.
    pub fn parse_pair(text: &str) -> Result<Self, ObservationValidationError> {
        let malformed = || ObservationValidationError::MalformedLocation(text.to_string());
        let captures = LOCATION_PAIR_RE.captures(text).ok_or_else(malformed)?;
        let longitude = parse_decimal(&captures[1]).ok_or_else(malformed)?;
        let latitude = parse_decimal(&captures[2]).ok_or_else(malformed)?;
        Self::new(longitude, latitude)
    }

    /// Checks coordinate invariants.
    pub fn validate(&self) -> Result<(), ObservationValidationError> {
        if !is_valid_longitude(self.longitude) {
            return Err(ObservationValidationError::LongitudeOutOfRange(
                self.longitude,
            ));
        }
        if !is_valid_latitude(self.latitude) {
            return Err(ObservationValidationError::LatitudeOutOfRange(
                self.latitude,
            ));
        }
        Ok(())
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.longitude, self.latitude)
    }
}

/// Returns whether `value` is a finite longitude in [-180, 180].
pub fn is_valid_longitude(value: f64) -> bool {
    value.is_finite() && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&value)
}

/// Returns whether `value` is a finite latitude in [-90, 90].
pub fn is_valid_latitude(value: f64) -> bool {
    value.is_finite() && (MIN_LATITUDE..=MAX_LATITUDE).contains(&value)
}

/// Validated content of one observation, without identity.
///
/// Produced by parsing form input; combined with an id to become a
/// [`TreeObservation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationFields {
    pub tree_count: u64,
    pub location: Location,
    pub growth_stage: GrowthStage,
}

impl ObservationFields {
    pub fn new(
        tree_count: u64,
        location: Location,
        growth_stage: GrowthStage,
    ) -> Result<Self, ObservationValidationError> {
        let fields = Self {
            tree_count,
            location,
            growth_stage,
        };
        fields.validate()?;
        Ok(fields)
    }

    pub fn validate(&self) -> Result<(), ObservationValidationError> {
        if self.tree_count == 0 {
            return Err(ObservationValidationError::ZeroTreeCount);
        }
        self.location.validate()
    }
}

/// Canonical record for one logged planting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeObservationWire")]
pub struct TreeObservation {
    /// Assigned once at creation; edits never change it.
    pub id: ObservationId,
    pub tree_count: u64,
    pub location: Location,
    pub growth_stage: GrowthStage,
}

#[derive(Deserialize)]
struct TreeObservationWire {
    id: ObservationId,
    tree_count: u64,
    location: Location,
    growth_stage: GrowthStage,
}

impl TryFrom<TreeObservationWire> for TreeObservation {
    type Error = ObservationValidationError;

    fn try_from(value: TreeObservationWire) -> Result<Self, Self::Error> {
        let observation = Self {
            id: value.id,
            tree_count: value.tree_count,
            location: value.location,
            growth_stage: value.growth_stage,
        };
        observation.validate()?;
        Ok(observation)
    }
}

impl TreeObservation {
    /// Creates an observation with a freshly generated id.
    pub fn new(fields: ObservationFields) -> Self {
        Self::from_parts(Uuid::new_v4(), fields)
    }

    /// Creates an observation with a caller-provided id.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil UUID.
    /// - Field errors when `fields` were assembled without their constructor.
    pub fn with_id(
        id: ObservationId,
        fields: ObservationFields,
    ) -> Result<Self, ObservationValidationError> {
        let observation = Self::from_parts(id, fields);
        observation.validate()?;
        Ok(observation)
    }

    fn from_parts(id: ObservationId, fields: ObservationFields) -> Self {
        Self {
            id,
            tree_count: fields.tree_count,
            location: fields.location,
            growth_stage: fields.growth_stage,
        }
    }

    /// Returns the editable content of this observation.
    pub fn fields(&self) -> ObservationFields {
        ObservationFields {
            tree_count: self.tree_count,
            location: self.location,
            growth_stage: self.growth_stage,
        }
    }

    /// Returns a copy with `fields` replaced and the same id.
    pub fn with_fields(&self, fields: ObservationFields) -> Self {
        Self::from_parts(self.id, fields)
    }

    pub fn validate(&self) -> Result<(), ObservationValidationError> {
        if self.id.is_nil() {
            return Err(ObservationValidationError::NilId);
        }
        self.fields().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{GrowthStage, Location, ObservationValidationError};

    #[test]
    fn growth_stage_parses_case_insensitively() {
        assert_eq!(" Sapling ".parse::<GrowthStage>(), Ok(GrowthStage::Sapling));
        assert_eq!(
            "tree".parse::<GrowthStage>(),
            Err(ObservationValidationError::UnknownGrowthStage(
                "tree".to_string()
            ))
        );
    }

    #[test]
    fn location_bounds_are_inclusive() {
        assert!(Location::new(-180.0, 90.0).is_ok());
        assert!(Location::new(180.0, -90.0).is_ok());
        assert_eq!(
            Location::new(180.5, 0.0),
            Err(ObservationValidationError::LongitudeOutOfRange(180.5))
        );
        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn location_pair_rejects_missing_half() {
        let err = Location::parse_pair("12.5").unwrap_err();
        assert_eq!(
            err,
            ObservationValidationError::MalformedLocation("12.5".to_string())
        );
    }
}
