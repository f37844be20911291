//! Session storage for observations.
//!
//! # Responsibility
//! - Hold the in-memory observation collection owned by the UI shell.
//!
//! # Invariants
//! - Writes enforce `TreeObservation::validate()` before producing a new log.
//! - Writes return semantic errors (`NotFound`, `DuplicateId`) instead of
//!   silently ignoring the request.

pub mod observation_log;
