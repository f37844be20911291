//! Tree observation domain model.
//!
//! # Responsibility
//! - Define the canonical record the UI shell logs, edits and reports on.
//! - Own numeric literal parsing shared by record and criteria validation.
//!
//! # Invariants
//! - Every observation is identified by a stable, non-nil `ObservationId`.
//! - Typed values (`Location`, `ObservationFields`) are only built through
//!   constructors that enforce range invariants.

pub mod literal;
pub mod observation;
