//! FFI use-case API for the Flutter UI shell.
//!
//! # Responsibility
//! - Expose validation, log/update submission and report filtering to Dart
//!   via FRB.
//! - Translate between flat DTOs and core domain types.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The shell owns the observation collection; calls here are stateless.
//!   Log and update return the full new collection for the shell to keep.

use log::warn;
use treelog_core::{
    core_version as core_version_inner, filter, init_logging as init_logging_inner,
    is_record_valid as is_record_valid_inner, validate, CandidateRecord, CriteriaField,
    CriteriaForm, FieldName, GrowthStage, Location, ObservationFields, ObservationLog,
    ObservationService, SubmitError, TreeObservation, LOGGED_MESSAGE, REJECTED_MESSAGE,
    UPDATED_MESSAGE,
};
use uuid::Uuid;

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Validation outcome for one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    /// Field name as sent by the shell.
    pub field: String,
    pub valid: bool,
    /// Inline message; empty when valid.
    pub message: String,
}

impl FieldCheck {
    fn new(field: impl Into<String>, message: Option<&str>) -> Self {
        Self {
            field: field.into(),
            valid: message.is_none(),
            message: message.unwrap_or_default().to_string(),
        }
    }
}

/// Flat observation shape exchanged with the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationDto {
    pub id: String,
    pub tree_count: u64,
    pub longitude: f64,
    pub latitude: f64,
    /// `seedling|sapling|mature`.
    pub growth_stage: String,
}

impl From<&TreeObservation> for ObservationDto {
    fn from(value: &TreeObservation) -> Self {
        Self {
            id: value.id.to_string(),
            tree_count: value.tree_count,
            longitude: value.location.longitude,
            latitude: value.location.latitude,
            growth_stage: value.growth_stage.as_str().to_string(),
        }
    }
}

/// Raw text of the entry and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRecordDto {
    pub tree_count: String,
    pub longitude: String,
    pub latitude: String,
    pub growth_stage: String,
}

impl From<CandidateRecordDto> for CandidateRecord {
    fn from(value: CandidateRecordDto) -> Self {
        Self::new(
            value.tree_count,
            value.longitude,
            value.latitude,
            value.growth_stage,
        )
    }
}

/// Log/update response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryResponse {
    /// Whether the submission was accepted.
    pub ok: bool,
    /// Logged or updated observation; `None` when rejected.
    pub observation: Option<ObservationDto>,
    /// Full collection after the call; the input records when rejected.
    pub records: Vec<ObservationDto>,
    /// Per-field checks for the submitted form.
    pub checks: Vec<FieldCheck>,
    /// Popup message for the shell.
    pub message: String,
}

impl EntryResponse {
    fn accepted(
        service: &ObservationService,
        observation: &TreeObservation,
        candidate: &CandidateRecord,
        message: &str,
    ) -> Self {
        Self {
            ok: true,
            observation: Some(observation.into()),
            records: service
                .log()
                .entries()
                .iter()
                .map(ObservationDto::from)
                .collect(),
            checks: entry_checks(candidate),
            message: message.to_string(),
        }
    }

    fn rejected(records: Vec<ObservationDto>, candidate: &CandidateRecord, message: &str) -> Self {
        Self {
            ok: false,
            observation: None,
            records,
            checks: entry_checks(candidate),
            message: message.to_string(),
        }
    }
}

/// Raw text of the report filter form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaFormDto {
    pub min_tree_count: String,
    pub max_tree_count: String,
    pub growth_stage: String,
    pub min_longitude: String,
    pub max_longitude: String,
    pub min_latitude: String,
    pub max_latitude: String,
}

impl From<CriteriaFormDto> for CriteriaForm {
    fn from(value: CriteriaFormDto) -> Self {
        Self {
            min_tree_count: value.min_tree_count,
            max_tree_count: value.max_tree_count,
            growth_stage: value.growth_stage,
            min_longitude: value.min_longitude,
            max_longitude: value.max_longitude,
            min_latitude: value.min_latitude,
            max_latitude: value.max_latitude,
        }
    }
}

/// Report response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportResponse {
    /// Whether the criteria were valid and filtering ran.
    pub ok: bool,
    /// Matching observations in input order; empty when `ok` is false.
    pub items: Vec<ObservationDto>,
    /// Per-field checks for the filter form.
    pub checks: Vec<FieldCheck>,
    /// Human-readable diagnostics.
    pub message: String,
}

/// Validates one entry-form field as the user types.
///
/// # FFI contract
/// - Empty input reports valid (untouched field).
/// - Unknown field names report invalid with a diagnostic message.
#[flutter_rust_bridge::frb(sync)]
pub fn validate_field(field: String, raw_value: String) -> FieldCheck {
    match field.parse::<FieldName>() {
        Ok(name) => FieldCheck::new(field, validate(name, raw_value.as_str()).message()),
        Err(err) => {
            let message = err.to_string();
            FieldCheck::new(field, Some(message.as_str()))
        }
    }
}

/// Returns whether the entry form may be submitted.
#[flutter_rust_bridge::frb(sync)]
pub fn is_record_valid(
    tree_count: String,
    longitude: String,
    latitude: String,
    growth_stage: String,
) -> bool {
    is_record_valid_inner(&CandidateRecord::new(
        tree_count,
        longitude,
        latitude,
        growth_stage,
    ))
}

/// Logs a new observation into the shell-held collection.
///
/// # FFI contract
/// - All four fields must be present and valid; rejected submissions return
///   `ok = false`, the input records and per-field checks.
/// - On success `records` is the input collection with the new observation
///   appended.
#[flutter_rust_bridge::frb(sync)]
pub fn log_observation(
    records: Vec<ObservationDto>,
    candidate: CandidateRecordDto,
) -> EntryResponse {
    let candidate: CandidateRecord = candidate.into();
    let mut service = match service_from_dtos(&records) {
        Ok(service) => service,
        Err(message) => {
            warn!("event=ffi_log module=ffi status=invalid_record error={message}");
            return EntryResponse::rejected(records, &candidate, REJECTED_MESSAGE);
        }
    };

    match service.log_observation(&candidate) {
        Ok(observation) => {
            EntryResponse::accepted(&service, &observation, &candidate, LOGGED_MESSAGE)
        }
        Err(err) => submit_rejected(records, &candidate, &err),
    }
}

/// Replaces the fields of one observation in the shell-held collection.
///
/// # FFI contract
/// - `id` must name an observation in `records`.
/// - An edit that changes nothing returns `ok = false` with the
///   "No changes to update." message.
/// - On success the observation keeps its id and position.
#[flutter_rust_bridge::frb(sync)]
pub fn update_observation(
    records: Vec<ObservationDto>,
    id: String,
    candidate: CandidateRecordDto,
) -> EntryResponse {
    let candidate: CandidateRecord = candidate.into();
    let id = match Uuid::parse_str(id.trim()) {
        Ok(id) => id,
        Err(err) => {
            warn!("event=ffi_update module=ffi status=invalid_id error={err}");
            return EntryResponse::rejected(records, &candidate, REJECTED_MESSAGE);
        }
    };
    let mut service = match service_from_dtos(&records) {
        Ok(service) => service,
        Err(message) => {
            warn!("event=ffi_update module=ffi status=invalid_record error={message}");
            return EntryResponse::rejected(records, &candidate, REJECTED_MESSAGE);
        }
    };

    match service.update_observation(id, &candidate) {
        Ok(observation) => {
            EntryResponse::accepted(&service, &observation, &candidate, UPDATED_MESSAGE)
        }
        Err(err) => submit_rejected(records, &candidate, &err),
    }
}

/// Validates every filter-form field, including min/max ordering.
#[flutter_rust_bridge::frb(sync)]
pub fn validate_criteria(form: CriteriaFormDto) -> Vec<FieldCheck> {
    criteria_checks(&form.into())
}

/// Filters shell-held observations by the report form.
///
/// # FFI contract
/// - Invalid criteria return `ok = false` with per-field checks; no
///   filtering is applied.
/// - Records that fail core invariants are reported, not filtered.
#[flutter_rust_bridge::frb(sync)]
pub fn filter_observations(records: Vec<ObservationDto>, form: CriteriaFormDto) -> ReportResponse {
    let form: CriteriaForm = form.into();
    let checks = criteria_checks(&form);
    let criteria = match form.to_criteria() {
        Ok(criteria) => criteria,
        Err(errors) => {
            return ReportResponse {
                ok: false,
                items: Vec::new(),
                checks,
                message: format!("filter_observations rejected criteria: {errors}"),
            };
        }
    };

    let observations = match records
        .iter()
        .map(observation_from_dto)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(observations) => observations,
        Err(message) => {
            warn!("event=ffi_filter module=ffi status=invalid_record");
            return ReportResponse {
                ok: false,
                items: Vec::new(),
                checks,
                message,
            };
        }
    };

    let items = filter(&observations, &criteria)
        .iter()
        .map(ObservationDto::from)
        .collect::<Vec<_>>();
    ReportResponse {
        ok: true,
        message: format!("{} of {} observations matched", items.len(), observations.len()),
        items,
        checks,
    }
}

fn criteria_checks(form: &CriteriaForm) -> Vec<FieldCheck> {
    let errors = form.errors();
    CriteriaField::ALL
        .into_iter()
        .map(|field| {
            let message = errors.get(field).map(|err| err.to_string());
            FieldCheck::new(field.as_str(), message.as_deref())
        })
        .collect()
}

fn entry_checks(candidate: &CandidateRecord) -> Vec<FieldCheck> {
    let errors = candidate.parse().err().unwrap_or_default();
    FieldName::ALL
        .into_iter()
        .map(|field| {
            let message = errors.get(field).map(|err| err.message());
            FieldCheck::new(field.as_str(), message)
        })
        .collect()
}

fn submit_rejected(
    records: Vec<ObservationDto>,
    candidate: &CandidateRecord,
    err: &SubmitError,
) -> EntryResponse {
    EntryResponse::rejected(records, candidate, err.user_message())
}

fn service_from_dtos(records: &[ObservationDto]) -> Result<ObservationService, String> {
    let observations = records
        .iter()
        .map(observation_from_dto)
        .collect::<Result<Vec<_>, _>>()?;
    let log = ObservationLog::from_entries(observations).map_err(|err| err.to_string())?;
    Ok(ObservationService::with_log(log))
}

fn observation_from_dto(dto: &ObservationDto) -> Result<TreeObservation, String> {
    let id = Uuid::parse_str(dto.id.trim())
        .map_err(|err| format!("invalid observation id `{}`: {err}", dto.id))?;
    let growth_stage = dto
        .growth_stage
        .parse::<GrowthStage>()
        .map_err(|err| err.to_string())?;
    let location = Location::new(dto.longitude, dto.latitude).map_err(|err| err.to_string())?;
    let fields = ObservationFields::new(dto.tree_count, location, growth_stage)
        .map_err(|err| err.to_string())?;
    TreeObservation::with_id(id, fields).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{
        filter_observations, is_record_valid, log_observation, update_observation,
        validate_criteria, validate_field, CandidateRecordDto, CriteriaFormDto, ObservationDto,
    };

    const FIRST_ID: &str = "11111111-2222-4333-8444-555555555555";
    const SECOND_ID: &str = "11111111-2222-4333-8444-666666666666";

    fn dto(id: &str, tree_count: u64, stage: &str) -> ObservationDto {
        ObservationDto {
            id: id.to_string(),
            tree_count,
            longitude: 10.0,
            latitude: 20.0,
            growth_stage: stage.to_string(),
        }
    }

    fn candidate(
        tree_count: &str,
        longitude: &str,
        latitude: &str,
        stage: &str,
    ) -> CandidateRecordDto {
        CandidateRecordDto {
            tree_count: tree_count.to_string(),
            longitude: longitude.to_string(),
            latitude: latitude.to_string(),
            growth_stage: stage.to_string(),
        }
    }

    #[test]
    fn validate_field_reports_message_and_unknown_fields() {
        let check = validate_field("treeCount".to_string(), "0".to_string());
        assert!(!check.valid);
        assert_eq!(check.message, "Please enter a valid number greater than 0.");

        let pending = validate_field("latitude".to_string(), String::new());
        assert!(pending.valid);
        assert!(pending.message.is_empty());

        let unknown = validate_field("height".to_string(), "3".to_string());
        assert!(!unknown.valid);
        assert!(unknown.message.contains("unknown field"));
    }

    #[test]
    fn is_record_valid_requires_all_fields() {
        assert!(is_record_valid(
            "3".to_string(),
            "1".to_string(),
            "2".to_string(),
            "mature".to_string()
        ));
        assert!(!is_record_valid(
            "3".to_string(),
            "1".to_string(),
            "2".to_string(),
            String::new()
        ));
    }

    #[test]
    fn validate_criteria_returns_one_check_per_field() {
        let checks = validate_criteria(CriteriaFormDto {
            min_latitude: "10".to_string(),
            max_latitude: "5".to_string(),
            ..CriteriaFormDto::default()
        });
        assert_eq!(checks.len(), 7);
        let max_latitude = checks
            .iter()
            .find(|check| check.field == "max_latitude")
            .unwrap();
        assert!(!max_latitude.valid);
        assert_eq!(checks.iter().filter(|check| !check.valid).count(), 1);
    }

    #[test]
    fn filter_observations_applies_valid_criteria() {
        let records = vec![
            dto("11111111-2222-4333-8444-555555555555", 5, "seedling"),
            dto("11111111-2222-4333-8444-666666666666", 15, "sapling"),
        ];
        let response = filter_observations(
            records.clone(),
            CriteriaFormDto {
                min_tree_count: "10".to_string(),
                ..CriteriaFormDto::default()
            },
        );
        assert!(response.ok);
        assert_eq!(response.items, vec![records[1].clone()]);
        assert_eq!(response.message, "1 of 2 observations matched");
    }

    #[test]
    fn filter_observations_rejects_invalid_records() {
        let response = filter_observations(
            vec![dto("not-a-uuid", 5, "seedling")],
            CriteriaFormDto::default(),
        );
        assert!(!response.ok);
        assert!(response.items.is_empty());
        assert!(response.message.contains("invalid observation id"));
    }

    #[test]
    fn log_observation_appends_to_records() {
        let records = vec![dto(FIRST_ID, 5, "seedling")];
        let response = log_observation(
            records.clone(),
            candidate("12", "-73.98", "40.75", "sapling"),
        );

        assert!(response.ok);
        assert_eq!(response.message, "Data logged successfully!");
        assert_eq!(response.records.len(), 2);
        assert_eq!(response.records[0], records[0]);
        let logged = response.observation.unwrap();
        assert_eq!(logged.tree_count, 12);
        assert_eq!(logged.growth_stage, "sapling");
        assert_eq!(response.records[1], logged);
        assert!(response.checks.iter().all(|check| check.valid));
    }

    #[test]
    fn log_observation_rejects_invalid_candidate() {
        let records = vec![dto(FIRST_ID, 5, "seedling")];
        let response = log_observation(records.clone(), candidate("0", "500", "1", ""));

        assert!(!response.ok);
        assert_eq!(response.message, "Invalid data or no data selected!");
        assert_eq!(response.records, records);
        assert!(response.observation.is_none());
        let invalid = response
            .checks
            .iter()
            .filter(|check| !check.valid)
            .map(|check| check.field.as_str())
            .collect::<Vec<_>>();
        assert_eq!(invalid, vec!["tree_count", "longitude", "growth_stage"]);
    }

    #[test]
    fn update_observation_keeps_id_and_position() {
        let records = vec![dto(FIRST_ID, 5, "seedling"), dto(SECOND_ID, 15, "sapling")];
        let response = update_observation(
            records.clone(),
            SECOND_ID.to_string(),
            candidate("20", "10", "20", "mature"),
        );

        assert!(response.ok);
        assert_eq!(response.message, "Data updated successfully!");
        let ids = response
            .records
            .iter()
            .map(|record| record.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![FIRST_ID, SECOND_ID]);
        assert_eq!(response.records[0], records[0]);
        assert_eq!(response.records[1].tree_count, 20);
        assert_eq!(response.records[1].growth_stage, "mature");
    }

    #[test]
    fn update_observation_without_changes_is_rejected() {
        let records = vec![dto(FIRST_ID, 5, "seedling")];
        let response = update_observation(
            records.clone(),
            FIRST_ID.to_string(),
            candidate("5", "10", "20", "seedling"),
        );

        assert!(!response.ok);
        assert_eq!(response.message, "No changes to update.");
        assert_eq!(response.records, records);
        assert!(response.checks.iter().all(|check| check.valid));
    }

    #[test]
    fn update_observation_rejects_unknown_or_malformed_id() {
        let records = vec![dto(FIRST_ID, 5, "seedling")];
        for id in [SECOND_ID, "not-a-uuid"] {
            let response = update_observation(
                records.clone(),
                id.to_string(),
                candidate("6", "10", "20", "seedling"),
            );
            assert!(!response.ok, "{id}");
            assert_eq!(response.message, "Invalid data or no data selected!");
            assert_eq!(response.records, records);
        }
    }
}
