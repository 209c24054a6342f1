#![forbid(unsafe_code)]
//! officiate-core library.
//!
//! Data model, input validation and project configuration shared by the
//! flow engine, the simulator and the CLI.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for validation and problem files; `anyhow::Result`
//!   for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod model;
pub mod validate;

pub use error::{ErrorCode, ProblemFileError, ValidationError};
pub use model::{
    Certification, CertificationSet, Day, DayHours, Hours, Match, MatchId, Problem, Referee,
    RefereeId, overlapping_pairs,
};
pub use validate::{validate, validate_problem};
