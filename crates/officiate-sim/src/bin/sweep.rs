#![forbid(unsafe_code)]

use std::path::Path;

use anyhow::{Context, Result};
use officiate_sim::{run_project_experiment, write_csv_file};

const OUTPUT: &str = "experiment_output.csv";

fn main() -> Result<()> {
    let project_root = std::env::current_dir().context("Failed to resolve working directory")?;
    let report = run_project_experiment(&project_root)?;
    write_csv_file(&report.rows, Path::new(OUTPUT))?;

    println!(
        "sweep complete: runs={} feasible={} output={OUTPUT}",
        report.runs(),
        report.feasible_runs()
    );

    Ok(())
}
