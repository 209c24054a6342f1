//! `ofc experiment` — run the feasibility sweep and write the CSV report.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use officiate_core::Day;
use officiate_core::config::ExperimentConfig;
use officiate_sim::{ExperimentRow, run_experiment, write_csv_file};
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Default CSV path, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "experiment_output.csv";

/// Arguments for `ofc experiment`.
#[derive(Args, Debug, Default)]
pub struct ExperimentArgs {
    /// Base seed; run `i` uses `seed + i`. Overrides `officiate.toml`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Days per generated problem. Overrides `officiate.toml`.
    #[arg(long)]
    pub days: Option<Day>,

    /// Smallest match count. Overrides `officiate.toml`.
    #[arg(long)]
    pub min_matches: Option<usize>,

    /// Largest match count. Overrides `officiate.toml`.
    #[arg(long)]
    pub max_matches: Option<usize>,

    /// CSV output path.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

impl ExperimentArgs {
    /// Apply flag overrides on top of the configured sweep.
    fn apply(&self, mut config: ExperimentConfig) -> ExperimentConfig {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(days) = self.days {
            config.days = days;
        }
        if let Some(min) = self.min_matches {
            config.min_matches = min;
        }
        if let Some(max) = self.max_matches {
            config.max_matches = max;
        }
        config
    }
}

#[derive(Debug, Serialize)]
struct ExperimentSummary {
    output: String,
    config: ExperimentConfig,
    runs: usize,
    feasible_runs: usize,
    first_infeasible: Option<usize>,
    total_runtime_ms: f64,
    rows: Vec<ExperimentRow>,
}

/// Execute `ofc experiment`.
pub fn run_experiment_cmd(
    args: &ExperimentArgs,
    configured: &ExperimentConfig,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let config = args.apply(configured.clone());
    let report = run_experiment(&config)?;
    write_csv_file(&report.rows, &project_root.join(&args.output))?;

    let summary = ExperimentSummary {
        output: args.output.display().to_string(),
        runs: report.runs(),
        feasible_runs: report.feasible_runs(),
        first_infeasible: report.first_infeasible(),
        total_runtime_ms: report.total_runtime_ms(),
        config,
        rows: report.rows,
    };

    render_mode(output, &summary, render_text, render_pretty)
}

fn render_text(s: &ExperimentSummary, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "runs={} feasible={} output={}",
        s.runs, s.feasible_runs, s.output
    )
}

fn render_pretty(s: &ExperimentSummary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Feasibility sweep")?;
    pretty_kv(
        w,
        "Matches",
        format!(
            "{}..={} step {}",
            s.config.min_matches, s.config.max_matches, s.config.step
        ),
    )?;
    pretty_kv(w, "Days", s.config.days.to_string())?;
    pretty_kv(w, "Seed", s.config.seed.to_string())?;
    pretty_kv(w, "Feasible", format!("{} of {} run(s)", s.feasible_runs, s.runs))?;
    if let Some(matches) = s.first_infeasible {
        pretty_kv(w, "First miss", format!("{matches} matches"))?;
    }
    pretty_kv(w, "Runtime", format!("{:.3} ms", s.total_runtime_ms))?;
    pretty_kv(w, "Output", &s.output)?;

    writeln!(w)?;
    writeln!(
        w,
        "  {:>8} {:>8} {:>9} {:>7}/{:<7} {:>10}",
        "matches", "referees", "feasible", "flow", "demand", "ms"
    )?;
    for row in &s.rows {
        writeln!(
            w,
            "  {:>8} {:>8} {:>9} {:>7}/{:<7} {:>10.3}",
            row.matches,
            row.referees,
            if row.feasible { "yes" } else { "no" },
            row.achieved_flow,
            row.total_demand,
            row.runtime_ms
        )?;
    }
    Ok(())
}
