//! Core domain logic for TreeLog.
//! This crate is the single source of truth for observation invariants,
//! form validation and report filtering.

pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::observation::{
    GrowthStage, Location, ObservationFields, ObservationId, ObservationValidationError,
    TreeObservation,
};
pub use report::filter::{filter, FilterCriteria};
pub use repo::observation_log::{LogError, LogResult, LogSummary, ObservationLog};
pub use service::observation_service::{
    has_changes, ObservationService, SubmitError, LOGGED_MESSAGE, REJECTED_MESSAGE,
    UNCHANGED_MESSAGE, UPDATED_MESSAGE,
};
pub use validation::criteria::{
    validate_criteria_field, CriteriaError, CriteriaErrors, CriteriaField, CriteriaForm,
    RangeDimension,
};
pub use validation::field::{
    check_field, validate, FieldError, FieldName, UnknownFieldError, ValidationResult,
};
pub use validation::record::{is_record_valid, CandidateRecord, RecordErrors};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
