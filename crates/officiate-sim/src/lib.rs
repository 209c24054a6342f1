#![forbid(unsafe_code)]
//! officiate-sim library.
//!
//! Seeded problem generation and the feasibility sweep that drives the
//! `officiate-sweep` binary and `ofc experiment`.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod experiment;
pub mod generate;
pub mod report;

pub use experiment::{
    ExperimentReport, ExperimentRow, replay_run, run_experiment, run_once, run_project_experiment,
};
pub use generate::{GeneratorConfig, generate_matches, generate_problem, generate_referees};
pub use report::{write_csv, write_csv_file};
