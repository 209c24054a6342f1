//! `ofc check` — load a problem file and decide whether it can be staffed.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use officiate_core::{Day, MatchId, Problem, overlapping_pairs};
use officiate_flow::{FeasibilityReport, evaluate_problem};
use serde::Serialize;
use tracing::{info, warn};

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Exit status for a problem that loaded and solved but cannot be staffed.
pub const EXIT_INFEASIBLE: u8 = 2;

/// Arguments for `ofc check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Problem file (`.json` or `.toml`).
    pub file: PathBuf,
}

/// Report payload for `ofc check`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub file: String,
    pub days: Day,
    pub referees: usize,
    pub matches: usize,
    #[serde(flatten)]
    pub report: FeasibilityReport,
    /// Same-day match pairs whose time ranges intersect. Reported only; the
    /// network does not forbid one referee from covering both.
    pub overlapping_pairs: Vec<(MatchId, MatchId)>,
}

/// Execute `ofc check`.
///
/// Returns exit code 0 when feasible, [`EXIT_INFEASIBLE`] when not, and 1
/// after rendering a load or validation error.
pub fn run_check(
    args: &CheckArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<ExitCode> {
    let path = if args.file.is_absolute() {
        args.file.clone()
    } else {
        project_root.join(&args.file)
    };

    let problem = match Problem::load(&path) {
        Ok(problem) => problem,
        Err(err) => {
            render_error(output, &CliError::coded(err.to_string(), err.code()))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let report = match evaluate_problem(&problem) {
        Ok(report) => report,
        Err(err) => {
            render_error(output, &CliError::coded(err.to_string(), err.code()))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let overlapping = overlapping_pairs(&problem.matches);
    if !overlapping.is_empty() {
        warn!(
            pairs = overlapping.len(),
            "overlapping same-day matches may share one referee's budget"
        );
    }

    let payload = CheckReport {
        file: args.file.display().to_string(),
        days: problem.days,
        referees: problem.referees.len(),
        matches: problem.matches.len(),
        report,
        overlapping_pairs: overlapping,
    };
    info!(
        file = %payload.file,
        feasible = payload.report.result.feasible,
        "check complete"
    );

    render_mode(output, &payload, render_text, render_pretty)?;

    Ok(if payload.report.result.feasible {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INFEASIBLE)
    })
}

fn render_text(payload: &CheckReport, w: &mut dyn Write) -> std::io::Result<()> {
    let result = payload.report.result;
    writeln!(
        w,
        "feasible={} achieved_flow={} total_demand={}",
        result.feasible, result.achieved_flow, result.total_demand
    )?;
    for u in &payload.report.uncovered {
        writeln!(
            w,
            "uncovered match={} required={} uncovered={}",
            u.match_id, u.required, u.uncovered
        )?;
    }
    for (a, b) in &payload.overlapping_pairs {
        writeln!(w, "overlap {a} {b}")?;
    }
    Ok(())
}

fn render_pretty(payload: &CheckReport, w: &mut dyn Write) -> std::io::Result<()> {
    let report = &payload.report;
    let result = report.result;

    pretty_section(w, "Feasibility check")?;
    pretty_kv(w, "File", &payload.file)?;
    pretty_kv(
        w,
        "Problem",
        format!(
            "{} referee(s), {} match(es), {} day(s)",
            payload.referees, payload.matches, payload.days
        ),
    )?;
    pretty_kv(
        w,
        "Verdict",
        if result.feasible { "FEASIBLE" } else { "INFEASIBLE" },
    )?;
    pretty_kv(
        w,
        "Flow",
        format!("{} / {} hours", result.achieved_flow, result.total_demand),
    )?;
    if !result.feasible {
        pretty_kv(w, "Shortfall", format!("{} hours", result.shortfall()))?;
    }
    pretty_kv(
        w,
        "Network",
        format!("{} nodes, {} edges", report.nodes, report.edges),
    )?;
    pretty_kv(
        w,
        "Solver",
        format!(
            "{} phase(s), {} augmenting path(s)",
            report.phases, report.augmenting_paths
        ),
    )?;
    pretty_kv(w, "Hash", &report.content_hash)?;

    if !report.uncovered.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Uncovered matches")?;
        for u in &report.uncovered {
            writeln!(
                w,
                "  match {:<6} {} of {} hour(s) uncovered",
                u.match_id, u.uncovered, u.required
            )?;
        }
    }

    if !payload.overlapping_pairs.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "note: {} overlapping same-day match pair(s); one referee's daily hours may cover both",
            payload.overlapping_pairs.len()
        )?;
    }
    Ok(())
}
