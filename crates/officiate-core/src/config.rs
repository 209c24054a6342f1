use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::Day;

/// Name of the optional project config file, looked up in the working
/// directory.
pub const CONFIG_FILE: &str = "officiate.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Preferred output mode (`pretty`, `text`, `json`).
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub experiment: ExperimentConfig,
}

/// Parameters of the synthetic feasibility sweep.
///
/// Each run uses `matches` in `min_matches..=max_matches` stepping by
/// `step`, with `matches / referee_divisor` referees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default = "default_min_matches")]
    pub min_matches: usize,
    #[serde(default = "default_max_matches")]
    pub max_matches: usize,
    #[serde(default = "default_step")]
    pub step: usize,
    #[serde(default = "default_referee_divisor")]
    pub referee_divisor: usize,
    #[serde(default = "default_days")]
    pub days: Day,
    #[serde(default)]
    pub seed: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            min_matches: default_min_matches(),
            max_matches: default_max_matches(),
            step: default_step(),
            referee_divisor: default_referee_divisor(),
            days: default_days(),
            seed: 0,
        }
    }
}

impl ExperimentConfig {
    /// Match counts visited by the sweep, ascending.
    pub fn match_counts(&self) -> impl Iterator<Item = usize> {
        (self.min_matches..=self.max_matches).step_by(self.step.max(1))
    }

    /// Referee pool size used alongside `matches`.
    #[must_use]
    pub const fn referees_for(&self, matches: usize) -> usize {
        matches / self.referee_divisor
    }

    /// Validate configuration before running.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            bail!("step must be > 0");
        }
        if self.referee_divisor == 0 {
            bail!("referee_divisor must be > 0");
        }
        if self.days == 0 {
            bail!("days must be > 0");
        }
        if self.min_matches > self.max_matches {
            bail!(
                "min_matches ({}) must not exceed max_matches ({})",
                self.min_matches,
                self.max_matches
            );
        }
        Ok(())
    }
}

/// Load `officiate.toml` from `project_root`, or defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_min_matches() -> usize {
    20
}

const fn default_max_matches() -> usize {
    200
}

const fn default_step() -> usize {
    20
}

const fn default_referee_divisor() -> usize {
    3
}

const fn default_days() -> Day {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir must be created");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert!(cfg.output.is_none());
        assert_eq!(cfg.experiment, ExperimentConfig::default());
        assert_eq!(cfg.experiment.days, 2);
    }

    #[test]
    fn partial_experiment_section_keeps_other_defaults() {
        let root = tempfile::tempdir().expect("temp dir must be created");
        std::fs::write(
            root.path().join(CONFIG_FILE),
            r#"
output = "json"

[experiment]
max_matches = 60
seed = 42
"#,
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.output.as_deref(), Some("json"));
        assert_eq!(cfg.experiment.max_matches, 60);
        assert_eq!(cfg.experiment.seed, 42);
        assert_eq!(cfg.experiment.min_matches, 20);
        assert_eq!(cfg.experiment.step, 20);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let root = tempfile::tempdir().expect("temp dir must be created");
        std::fs::write(root.path().join(CONFIG_FILE), "experiment = [").expect("write config");
        assert!(load_project_config(root.path()).is_err());
    }

    #[test]
    fn default_sweep_matches_reference_experiment() {
        let cfg = ExperimentConfig::default();
        let counts: Vec<usize> = cfg.match_counts().collect();
        assert_eq!(counts.first(), Some(&20));
        assert_eq!(counts.last(), Some(&200));
        assert_eq!(counts.len(), 10);
        assert_eq!(cfg.referees_for(200), 66);
    }

    #[test]
    fn validate_rejects_degenerate_sweeps() {
        let zero_step = ExperimentConfig {
            step: 0,
            ..ExperimentConfig::default()
        };
        assert!(zero_step.validate().is_err());

        let inverted = ExperimentConfig {
            min_matches: 50,
            max_matches: 10,
            ..ExperimentConfig::default()
        };
        assert!(inverted.validate().is_err());

        assert!(ExperimentConfig::default().validate().is_ok());
    }
}
