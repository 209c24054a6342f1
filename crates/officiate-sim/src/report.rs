//! CSV output for experiment sweeps.
//!
//! One header row, then one record per run:
//!
//! ```text
//! matches,referees,days,feasible,achieved_flow,total_demand,runtime_ms
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::experiment::ExperimentRow;

/// Write `rows` as CSV to `writer`.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn write_csv<W: Write>(rows: &[ExperimentRow], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv.write_record([
            "matches",
            "referees",
            "days",
            "feasible",
            "achieved_flow",
            "total_demand",
            "runtime_ms",
        ])
        .context("write csv header")?;
    }
    for row in rows {
        csv.serialize(row).context("write csv record")?;
    }
    csv.flush().context("flush csv")?;
    Ok(())
}

/// Write `rows` to a CSV file at `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv_file(rows: &[ExperimentRow], path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(rows, file).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(matches: usize, feasible: bool) -> ExperimentRow {
        ExperimentRow {
            matches,
            referees: matches / 3,
            days: 2,
            feasible,
            achieved_flow: 12,
            total_demand: if feasible { 12 } else { 15 },
            runtime_ms: 0.5,
        }
    }

    #[test]
    fn header_then_one_line_per_row() {
        let mut buf = Vec::new();
        write_csv(&[row(20, true), row(40, false)], &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "matches,referees,days,feasible,achieved_flow,total_demand,runtime_ms"
        );
        assert_eq!(lines[1], "20,6,2,true,12,12,0.5");
        assert_eq!(lines[2], "40,13,2,false,12,15,0.5");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_sweep_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            text.trim_end(),
            "matches,referees,days,feasible,achieved_flow,total_demand,runtime_ms"
        );
    }

    #[test]
    fn file_output_is_readable_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sweep.csv");
        write_csv_file(&[row(20, true)], &path).expect("write file");

        let mut reader = csv::Reader::from_path(&path).expect("open csv");
        let rows: Vec<ExperimentRow> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .expect("parse rows");
        assert_eq!(rows, vec![row(20, true)]);
    }
}
