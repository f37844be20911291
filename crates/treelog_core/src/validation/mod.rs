//! Form validation for observation entry and report criteria.
//!
//! # Responsibility
//! - Decide whether raw form text is acceptable, field by field.
//! - Convert fully valid forms into typed model/query values.
//!
//! # Invariants
//! - Error maps are recomputed from current values; nothing is cached.
//! - Validation never panics and never surfaces a parse error as a failure.

pub mod criteria;
pub mod field;
pub mod record;
