//! Feasibility sweep over growing tournaments.
//!
//! For every match count in the configured range, generates a problem with
//! `matches / referee_divisor` referees, evaluates it, and records the
//! verdict with the wall-clock time of the evaluation. Run seeds are
//! `config.seed + run index`, so any row can be replayed on its own with
//! [`replay_run`].

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use officiate_core::Day;
use officiate_core::config::{ExperimentConfig, load_project_config};
use officiate_flow::evaluate_problem;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::generate::{GeneratorConfig, generate_problem};

/// One row of the sweep, also the CSV record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRow {
    pub matches: usize,
    pub referees: usize,
    pub days: Day,
    pub feasible: bool,
    pub achieved_flow: u64,
    pub total_demand: u64,
    pub runtime_ms: f64,
}

/// Aggregate result of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub seed: u64,
    pub rows: Vec<ExperimentRow>,
}

impl ExperimentReport {
    #[must_use]
    pub fn runs(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn feasible_runs(&self) -> usize {
        self.rows.iter().filter(|row| row.feasible).count()
    }

    /// Smallest match count whose run was infeasible.
    #[must_use]
    pub fn first_infeasible(&self) -> Option<usize> {
        self.rows
            .iter()
            .find(|row| !row.feasible)
            .map(|row| row.matches)
    }

    /// Sum of per-run evaluation times.
    #[must_use]
    pub fn total_runtime_ms(&self) -> f64 {
        self.rows.iter().map(|row| row.runtime_ms).sum()
    }
}

/// Run the sweep described by `config`.
///
/// # Errors
///
/// Returns an error if the config is invalid or a run fails to generate or
/// evaluate.
#[instrument(skip(config), fields(seed = config.seed, days = config.days))]
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentReport> {
    config.validate()?;

    let mut rows = Vec::new();
    for (index, matches) in config.match_counts().enumerate() {
        let seed = config.seed.wrapping_add(index as u64);
        let row = run_once(matches, config.referees_for(matches), config.days, seed)?;
        info!(
            matches = row.matches,
            referees = row.referees,
            feasible = row.feasible,
            achieved_flow = row.achieved_flow,
            total_demand = row.total_demand,
            runtime_ms = row.runtime_ms,
            "experiment run complete"
        );
        rows.push(row);
    }

    Ok(ExperimentReport {
        seed: config.seed,
        rows,
    })
}

/// Run the sweep configured by `officiate.toml` under `project_root`,
/// falling back to defaults when the file is absent.
///
/// # Errors
///
/// Returns an error if the config cannot be read or parsed, or the sweep
/// fails.
pub fn run_project_experiment(project_root: &Path) -> Result<ExperimentReport> {
    let config = load_project_config(project_root)?;
    run_experiment(&config.experiment)
}

/// Re-run the sweep row for `matches` exactly as [`run_experiment`] would.
///
/// # Errors
///
/// Returns an error if `matches` is not visited by the sweep, or the run
/// fails.
pub fn replay_run(config: &ExperimentConfig, matches: usize) -> Result<ExperimentRow> {
    config.validate()?;
    let index = config
        .match_counts()
        .position(|count| count == matches)
        .with_context(|| format!("the sweep does not visit {matches} matches"))?;
    let seed = config.seed.wrapping_add(index as u64);
    run_once(matches, config.referees_for(matches), config.days, seed)
}

/// Generate and evaluate a single problem.
///
/// # Errors
///
/// Returns an error if generation or evaluation fails.
pub fn run_once(matches: usize, referees: usize, days: Day, seed: u64) -> Result<ExperimentRow> {
    let problem = generate_problem(&GeneratorConfig::new(matches, referees, days), seed)?;

    let started = Instant::now();
    let report = evaluate_problem(&problem)
        .with_context(|| format!("evaluate {matches} matches / {referees} referees"))?;
    let runtime_ms = started.elapsed().as_secs_f64() * 1000.0;

    Ok(ExperimentRow {
        matches,
        referees,
        days,
        feasible: report.result.feasible,
        achieved_flow: report.result.achieved_flow,
        total_demand: report.result.total_demand,
        runtime_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ExperimentConfig {
        ExperimentConfig {
            min_matches: 10,
            max_matches: 40,
            step: 10,
            referee_divisor: 3,
            days: 2,
            seed: 11,
        }
    }

    #[test]
    fn sweep_visits_every_match_count() {
        let report = run_experiment(&small_config()).expect("sweep");
        let counts: Vec<_> = report.rows.iter().map(|row| row.matches).collect();
        assert_eq!(counts, vec![10, 20, 30, 40]);
        assert_eq!(report.runs(), 4);

        for row in &report.rows {
            assert_eq!(row.referees, row.matches / 3);
            assert!(row.achieved_flow <= row.total_demand);
            assert_eq!(row.feasible, row.achieved_flow == row.total_demand);
            assert!(row.runtime_ms >= 0.0);
        }
        assert!(report.feasible_runs() <= report.runs());
    }

    #[test]
    fn sweep_verdicts_are_reproducible() {
        let strip = |report: ExperimentReport| {
            report
                .rows
                .into_iter()
                .map(|row| (row.matches, row.feasible, row.achieved_flow, row.total_demand))
                .collect::<Vec<_>>()
        };
        let a = strip(run_experiment(&small_config()).expect("sweep a"));
        let b = strip(run_experiment(&small_config()).expect("sweep b"));
        assert_eq!(a, b);
    }

    #[test]
    fn replay_matches_sweep_row() {
        let config = small_config();
        let report = run_experiment(&config).expect("sweep");
        let replayed = replay_run(&config, 30).expect("replay");
        let original = &report.rows[2];
        assert_eq!(replayed.achieved_flow, original.achieved_flow);
        assert_eq!(replayed.total_demand, original.total_demand);
        assert_eq!(replayed.feasible, original.feasible);

        assert!(replay_run(&config, 35).is_err());
    }

    #[test]
    fn no_referees_means_infeasible() {
        let row = run_once(5, 0, 1, 3).expect("run");
        assert!(!row.feasible);
        assert_eq!(row.achieved_flow, 0);
        assert!(row.total_demand >= 5);
    }

    #[test]
    fn project_config_drives_the_sweep() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            root.path().join(officiate_core::config::CONFIG_FILE),
            "[experiment]\nmin_matches = 6\nmax_matches = 12\nstep = 3\nseed = 5\n",
        )
        .expect("write config");

        let report = run_project_experiment(root.path()).expect("sweep");
        let counts: Vec<_> = report.rows.iter().map(|row| row.matches).collect();
        assert_eq!(counts, vec![6, 9, 12]);
        assert_eq!(report.seed, 5);
    }

    #[test]
    fn invalid_project_config_is_reported() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            root.path().join(officiate_core::config::CONFIG_FILE),
            "[experiment]\nstep = 0\n",
        )
        .expect("write config");
        let err = run_project_experiment(root.path()).expect_err("step 0 rejected");
        assert!(format!("{err:#}").contains("step must be > 0"));
    }

    #[test]
    fn invalid_config_fails_fast() {
        let config = ExperimentConfig {
            referee_divisor: 0,
            ..small_config()
        };
        assert!(run_experiment(&config).is_err());
    }
}
