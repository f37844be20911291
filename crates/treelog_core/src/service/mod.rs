//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, the observation log and report filtering into
//!   the flows the UI shell drives.
//! - Keep the shell decoupled from parsing and collection details.

pub mod observation_service;
