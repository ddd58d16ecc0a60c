//! Run configuration.
//!
//! Every field has a serde default, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! steps = 500
//! threshold = 60.0
//! solver = "highs"
//! ```

use std::path::Path;

use peakpick_solver_common::SolverId;
use serde::{Deserialize, Serialize};

use crate::error::{PeakError, PeakResult};
use crate::model::ModelParams;

/// Parameters of one generate → assemble → solve → report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of time steps N.
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Seed for the input generator.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Threshold X0 a step's input must reach before it can be selected.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Maximum number of selected steps.
    #[serde(default = "default_max_active")]
    pub max_active: usize,
    /// Inputs are drawn uniformly from `[0, value_max)`.
    #[serde(default = "default_value_max")]
    pub value_max: f64,
    /// Solver time limit in seconds.
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: u64,
    /// External solver to use.
    #[serde(default)]
    pub solver: SolverId,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            seed: default_seed(),
            threshold: default_threshold(),
            max_active: default_max_active(),
            value_max: default_value_max(),
            time_limit_secs: default_time_limit(),
            solver: SolverId::default(),
        }
    }
}

fn default_steps() -> usize {
    20_000
}

fn default_seed() -> u64 {
    123
}

fn default_threshold() -> f64 {
    50.0
}

fn default_max_active() -> usize {
    100
}

fn default_value_max() -> f64 {
    100.0
}

fn default_time_limit() -> u64 {
    5
}

impl RunConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> PeakResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> PeakResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> PeakResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject parameters the model cannot be built from.
    pub fn validate(&self) -> PeakResult<()> {
        if self.steps == 0 {
            return Err(PeakError::InvalidConfiguration(
                "steps must be greater than 0".into(),
            ));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(PeakError::InvalidConfiguration(format!(
                "threshold must be a positive number, got {}",
                self.threshold
            )));
        }
        if !self.value_max.is_finite() || self.value_max <= 0.0 {
            return Err(PeakError::InvalidConfiguration(format!(
                "value_max must be a positive number, got {}",
                self.value_max
            )));
        }
        Ok(())
    }

    pub fn model_params(&self) -> ModelParams {
        ModelParams {
            threshold: self.threshold,
            max_active: self.max_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_run() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.steps, 20_000);
        assert_eq!(cfg.seed, 123);
        assert_eq!(cfg.threshold, 50.0);
        assert_eq!(cfg.max_active, 100);
        assert_eq!(cfg.time_limit_secs, 5);
        assert_eq!(cfg.solver, SolverId::Cbc);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = RunConfig::from_toml_str("steps = 5\nsolver = \"highs\"\n").unwrap();
        assert_eq!(cfg.steps, 5);
        assert_eq!(cfg.solver, SolverId::Highs);
        assert_eq!(cfg.threshold, 50.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let cfg = RunConfig {
            steps: 42,
            threshold: 12.5,
            ..RunConfig::default()
        };
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(RunConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = RunConfig::from_toml_str("steps = \"many\"").unwrap_err();
        assert!(matches!(err, PeakError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 7").unwrap();
        let cfg = RunConfig::load(file.path()).unwrap();
        assert_eq!(cfg.seed, 7);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RunConfig::load(Path::new("/nonexistent/peakpick.toml")).unwrap_err();
        assert!(matches!(err, PeakError::Io(_)));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let zero_steps = RunConfig {
            steps: 0,
            ..RunConfig::default()
        };
        assert!(matches!(
            zero_steps.validate(),
            Err(PeakError::InvalidConfiguration(_))
        ));

        let zero_threshold = RunConfig {
            threshold: 0.0,
            ..RunConfig::default()
        };
        assert!(zero_threshold.validate().is_err());

        let nan_range = RunConfig {
            value_max: f64::NAN,
            ..RunConfig::default()
        };
        assert!(nan_range.validate().is_err());

        let no_cap = RunConfig {
            max_active: 0,
            ..RunConfig::default()
        };
        assert!(no_cap.validate().is_ok());
    }
}
