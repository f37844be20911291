//! Validation for the report filter form.
//!
//! # Responsibility
//! - Validate each optional bound of the filter form.
//! - Flag inverted min/max pairs on the max field.
//! - Build [`FilterCriteria`] only from a form with no flagged field.
//!
//! # Invariants
//! - Empty inputs mean "no constraint" and are always valid. Whitespace-only
//!   input is treated as empty here, unlike entry-form `validate` where it is
//!   `Invalid`.
//! - A tree-count bound above `u64::MAX` saturates: a min admits no record and
//!   a max admits every record.
//! - Range ordering is checked only when both bounds parsed successfully.
//! - Errors are recomputed from the whole form, so editing either bound of a
//!   pair re-evaluates the ordering rule.

use crate::model::literal::{parse_decimal, parse_unsigned, Unsigned};
use crate::model::observation::{is_valid_latitude, is_valid_longitude, GrowthStage};
use crate::report::filter::FilterCriteria;
use crate::validation::field::{UnknownFieldError, ValidationResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Filter-form field identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CriteriaField {
    MinTreeCount,
    MaxTreeCount,
    GrowthStage,
    MinLongitude,
    MaxLongitude,
    MinLatitude,
    MaxLatitude,
}

impl CriteriaField {
    pub const ALL: [CriteriaField; 7] = [
        Self::MinTreeCount,
        Self::MaxTreeCount,
        Self::GrowthStage,
        Self::MinLongitude,
        Self::MaxLongitude,
        Self::MinLatitude,
        Self::MaxLatitude,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MinTreeCount => "min_tree_count",
            Self::MaxTreeCount => "max_tree_count",
            Self::GrowthStage => "growth_stage",
            Self::MinLongitude => "min_longitude",
            Self::MaxLongitude => "max_longitude",
            Self::MinLatitude => "min_latitude",
            Self::MaxLatitude => "max_latitude",
        }
    }
}

impl Display for CriteriaField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CriteriaField {
    type Err = UnknownFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "min_tree_count" | "minTreeCount" | "minTrees" => Ok(Self::MinTreeCount),
            "max_tree_count" | "maxTreeCount" | "maxTrees" => Ok(Self::MaxTreeCount),
            "growth_stage" | "growthStage" => Ok(Self::GrowthStage),
            "min_longitude" | "minLongitude" => Ok(Self::MinLongitude),
            "max_longitude" | "maxLongitude" => Ok(Self::MaxLongitude),
            "min_latitude" | "minLatitude" => Ok(Self::MinLatitude),
            "max_latitude" | "maxLatitude" => Ok(Self::MaxLatitude),
            other => Err(UnknownFieldError(other.to_string())),
        }
    }
}

/// Dimension constrained by a min/max pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDimension {
    TreeCount,
    Longitude,
    Latitude,
}

impl RangeDimension {
    fn label(self) -> &'static str {
        match self {
            Self::TreeCount => "Trees",
            Self::Longitude => "Longitude",
            Self::Latitude => "Latitude",
        }
    }
}

/// Rejection reason for one filter-form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaError {
    InvalidTreeCountBound,
    LongitudeBoundOutOfRange,
    LatitudeBoundOutOfRange,
    UnknownGrowthStage,
    /// Max bound is below the min bound of the same dimension.
    InvertedRange(RangeDimension),
}

impl Display for CriteriaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTreeCountBound => write!(f, "Value must be a non-negative integer."),
            Self::LongitudeBoundOutOfRange => write!(f, "Value must be between -180 and 180."),
            Self::LatitudeBoundOutOfRange => write!(f, "Value must be between -90 and 90."),
            Self::UnknownGrowthStage => write!(f, "Please select a growth stage."),
            Self::InvertedRange(dimension) => {
                let label = dimension.label();
                write!(
                    f,
                    "Max {label} must be greater than or equal to Min {label}."
                )
            }
        }
    }
}

impl Error for CriteriaError {}

/// Flagged filter-form fields, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaErrors {
    entries: Vec<(CriteriaField, CriteriaError)>,
}

impl CriteriaErrors {
    fn push(&mut self, field: CriteriaField, error: CriteriaError) {
        self.entries.push((field, error));
    }

    fn into_form_order(mut self) -> Self {
        self.entries.sort_by_key(|(field, _)| *field);
        self
    }

    pub fn get(&self, field: CriteriaField) -> Option<CriteriaError> {
        self.entries
            .iter()
            .find(|(flagged, _)| *flagged == field)
            .map(|(_, err)| *err)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CriteriaField, CriteriaError)> + '_ {
        self.entries.iter().copied()
    }

    /// Comma-separated names of flagged fields, for log events.
    pub fn field_list(&self) -> String {
        self.entries
            .iter()
            .map(|(field, _)| field.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Display for CriteriaErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .entries
            .iter()
            .map(|(field, err)| format!("{field}: {err}"))
            .collect::<Vec<_>>();
        write!(f, "{}", messages.join("; "))
    }
}

impl Error for CriteriaErrors {}

/// Raw text of the seven filter-form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaForm {
    pub min_tree_count: String,
    pub max_tree_count: String,
    pub growth_stage: String,
    pub min_longitude: String,
    pub max_longitude: String,
    pub min_latitude: String,
    pub max_latitude: String,
}

impl CriteriaForm {
    pub fn value(&self, field: CriteriaField) -> &str {
        match field {
            CriteriaField::MinTreeCount => &self.min_tree_count,
            CriteriaField::MaxTreeCount => &self.max_tree_count,
            CriteriaField::GrowthStage => &self.growth_stage,
            CriteriaField::MinLongitude => &self.min_longitude,
            CriteriaField::MaxLongitude => &self.max_longitude,
            CriteriaField::MinLatitude => &self.min_latitude,
            CriteriaField::MaxLatitude => &self.max_latitude,
        }
    }

    pub fn set(&mut self, field: CriteriaField, value: impl Into<String>) {
        let slot = match field {
            CriteriaField::MinTreeCount => &mut self.min_tree_count,
            CriteriaField::MaxTreeCount => &mut self.max_tree_count,
            CriteriaField::GrowthStage => &mut self.growth_stage,
            CriteriaField::MinLongitude => &mut self.min_longitude,
            CriteriaField::MaxLongitude => &mut self.max_longitude,
            CriteriaField::MinLatitude => &mut self.min_latitude,
            CriteriaField::MaxLatitude => &mut self.max_latitude,
        };
        *slot = value.into();
    }

    /// Builder-style variant of [`CriteriaForm::set`].
    pub fn with(mut self, field: CriteriaField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Recomputes every field error for the current values.
    pub fn errors(&self) -> CriteriaErrors {
        match self.evaluate() {
            Ok(_) => CriteriaErrors::default(),
            Err(errors) => errors,
        }
    }

    /// Converts the form into typed criteria.
    ///
    /// # Errors
    /// Returns all flagged fields when any bound is malformed or a pair is
    /// inverted; an inverted pair is never turned into criteria.
    pub fn to_criteria(&self) -> Result<FilterCriteria, CriteriaErrors> {
        self.evaluate()
    }

    fn evaluate(&self) -> Result<FilterCriteria, CriteriaErrors> {
        let mut errors = CriteriaErrors::default();
        let mut bound = |field: CriteriaField| -> Option<BoundValue> {
            match parse_bound(field, self.value(field)) {
                Ok(value) => value,
                Err(err) => {
                    errors.push(field, err);
                    None
                }
            }
        };

        let min_tree_count = bound(CriteriaField::MinTreeCount);
        let max_tree_count = bound(CriteriaField::MaxTreeCount);
        let growth_stage = bound(CriteriaField::GrowthStage);
        let min_longitude = bound(CriteriaField::MinLongitude);
        let max_longitude = bound(CriteriaField::MaxLongitude);
        let min_latitude = bound(CriteriaField::MinLatitude);
        let max_latitude = bound(CriteriaField::MaxLatitude);

        let criteria = FilterCriteria {
            min_tree_count: min_tree_count.and_then(BoundValue::count),
            max_tree_count: max_tree_count.and_then(BoundValue::count),
            growth_stage: growth_stage.and_then(BoundValue::stage),
            min_longitude: min_longitude.and_then(BoundValue::degrees),
            max_longitude: max_longitude.and_then(BoundValue::degrees),
            min_latitude: min_latitude.and_then(BoundValue::degrees),
            max_latitude: max_latitude.and_then(BoundValue::degrees),
        };

        if is_inverted(criteria.min_tree_count, criteria.max_tree_count) {
            errors.push(
                CriteriaField::MaxTreeCount,
                CriteriaError::InvertedRange(RangeDimension::TreeCount),
            );
        }
        if is_inverted(criteria.min_longitude, criteria.max_longitude) {
            errors.push(
                CriteriaField::MaxLongitude,
                CriteriaError::InvertedRange(RangeDimension::Longitude),
            );
        }
        if is_inverted(criteria.min_latitude, criteria.max_latitude) {
            errors.push(
                CriteriaField::MaxLatitude,
                CriteriaError::InvertedRange(RangeDimension::Latitude),
            );
        }

        if errors.is_empty() {
            Ok(criteria)
        } else {
            Err(errors.into_form_order())
        }
    }
}

/// Validates one filter-form field against the whole form.
///
/// The max field of a pair also reports the ordering rule, so callers must
/// re-run this for the max field whenever its min changes.
pub fn validate_criteria_field(form: &CriteriaForm, field: CriteriaField) -> ValidationResult {
    form.errors().get(field).into()
}

#[derive(Debug, Clone, Copy)]
enum BoundValue {
    Count(u64),
    Degrees(f64),
    Stage(GrowthStage),
}

impl BoundValue {
    fn count(self) -> Option<u64> {
        match self {
            Self::Count(value) => Some(value),
            _ => None,
        }
    }

    fn degrees(self) -> Option<f64> {
        match self {
            Self::Degrees(value) => Some(value),
            _ => None,
        }
    }

    fn stage(self) -> Option<GrowthStage> {
        match self {
            Self::Stage(value) => Some(value),
            _ => None,
        }
    }
}

fn parse_bound(field: CriteriaField, raw: &str) -> Result<Option<BoundValue>, CriteriaError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let value = match field {
        CriteriaField::MinTreeCount | CriteriaField::MaxTreeCount => {
            match parse_unsigned(raw).ok_or(CriteriaError::InvalidTreeCountBound)? {
                Unsigned::Value(count) => BoundValue::Count(count),
                Unsigned::Overflow if field == CriteriaField::MinTreeCount => {
                    BoundValue::Count(u64::MAX)
                }
                Unsigned::Overflow => return Ok(None),
            }
        }
        CriteriaField::MinLongitude | CriteriaField::MaxLongitude => parse_decimal(raw)
            .filter(|value| is_valid_longitude(*value))
            .map(BoundValue::Degrees)
            .ok_or(CriteriaError::LongitudeBoundOutOfRange)?,
        CriteriaField::MinLatitude | CriteriaField::MaxLatitude => parse_decimal(raw)
            .filter(|value| is_valid_latitude(*value))
            .map(BoundValue::Degrees)
            .ok_or(CriteriaError::LatitudeBoundOutOfRange)?,
        CriteriaField::GrowthStage => raw
            .parse::<GrowthStage>()
            .map(BoundValue::Stage)
            .map_err(|_| CriteriaError::UnknownGrowthStage)?,
    };
    Ok(Some(value))
}

fn is_inverted<T: PartialOrd>(min: Option<T>, max: Option<T>) -> bool {
    matches!((min, max), (Some(min), Some(max)) if max < min)
}

#[cfg(test)]
mod tests {
    use super::{is_inverted, parse_bound, BoundValue, CriteriaError, CriteriaField};

    #[test]
    fn blank_bound_is_no_constraint() {
        for field in CriteriaField::ALL {
            assert!(parse_bound(field, "").unwrap().is_none());
            assert!(parse_bound(field, "  ").unwrap().is_none());
        }
    }

    #[test]
    fn tree_count_bound_allows_zero_but_not_negative() {
        assert!(parse_bound(CriteriaField::MinTreeCount, "0").unwrap().is_some());
        assert_eq!(
            parse_bound(CriteriaField::MinTreeCount, "-1").unwrap_err(),
            CriteriaError::InvalidTreeCountBound
        );
    }

    #[test]
    fn tree_count_bound_accepts_counts_beyond_u32() {
        assert_eq!(
            parse_bound(CriteriaField::MaxTreeCount, "5000000000")
                .unwrap()
                .and_then(BoundValue::count),
            Some(5_000_000_000)
        );
    }

    #[test]
    fn oversized_tree_count_bound_saturates() {
        let huge = "18446744073709551616";
        assert_eq!(
            parse_bound(CriteriaField::MinTreeCount, huge)
                .unwrap()
                .and_then(BoundValue::count),
            Some(u64::MAX)
        );
        assert!(parse_bound(CriteriaField::MaxTreeCount, huge)
            .unwrap()
            .is_none());
    }

    #[test]
    fn equal_bounds_are_not_inverted() {
        assert!(!is_inverted(Some(10), Some(10)));
        assert!(is_inverted(Some(10.5), Some(10.0)));
        assert!(!is_inverted(None, Some(1)));
    }
}
