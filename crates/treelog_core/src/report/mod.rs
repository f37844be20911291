//! Report queries over the observation collection.
//!
//! # Responsibility
//! - Narrow a collection of observations by optional range bounds.
//!
//! # Invariants
//! - Filtering is pure and preserves input order.
//! - Absent bounds impose no constraint.

pub mod filter;
