//! `ofc generate` — write a seeded synthetic problem as JSON.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use officiate_core::Day;
use officiate_sim::{GeneratorConfig, generate_problem};
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `ofc generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of matches.
    #[arg(long)]
    pub matches: usize,

    /// Number of referees.
    #[arg(long)]
    pub referees: usize,

    /// Length of the scheduling horizon in days.
    #[arg(long, default_value_t = 2)]
    pub days: Day,

    /// Generator seed; the same seed always produces the same problem.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Write the problem here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GenerateSummary {
    output: String,
    matches: usize,
    referees: usize,
    days: Day,
    seed: u64,
    total_match_hours: Option<u64>,
}

/// Execute `ofc generate`.
///
/// Without `--output` the problem JSON itself is the command output.
pub fn run_generate(
    args: &GenerateArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let config = GeneratorConfig::new(args.matches, args.referees, args.days);
    let problem = generate_problem(&config, args.seed)?;
    let json = problem.to_json_pretty()?;

    let Some(ref target) = args.output else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{json}")?;
        return Ok(());
    };

    let path = project_root.join(target);
    std::fs::write(&path, format!("{json}\n"))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let summary = GenerateSummary {
        output: target.display().to_string(),
        matches: problem.matches.len(),
        referees: problem.referees.len(),
        days: problem.days,
        seed: args.seed,
        total_match_hours: problem.total_match_hours(),
    };

    render_mode(
        output,
        &summary,
        |s, w| {
            writeln!(
                w,
                "wrote {} matches={} referees={} days={}",
                s.output, s.matches, s.referees, s.days
            )
        },
        |s, w| {
            pretty_section(w, "Generated problem")?;
            pretty_kv(w, "Output", &s.output)?;
            pretty_kv(w, "Matches", s.matches.to_string())?;
            pretty_kv(w, "Referees", s.referees.to_string())?;
            pretty_kv(w, "Days", s.days.to_string())?;
            pretty_kv(w, "Seed", s.seed.to_string())?;
            if let Some(hours) = s.total_match_hours {
                pretty_kv(w, "Demand", format!("{hours} hours"))?;
            }
            Ok(())
        },
    )
}
