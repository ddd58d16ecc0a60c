//! Common CLI types shared across commands.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum, ValueHint};
use peakpick_core::RunConfig;
use peakpick_solver_common::SolverId;
use std::path::PathBuf;

/// Output format for reports and series.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable aligned table
    #[default]
    Table,
    /// Comma-separated values (pipe to awk/cut/etc)
    Csv,
    /// JSON object (pipe-friendly, structured)
    Json,
}

/// Model parameters accepted by every command that builds a model.
///
/// Precedence: flag, then `--config` file, then built-in default.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// TOML file with run parameters
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Number of time steps N
    #[arg(long)]
    pub steps: Option<usize>,

    /// Seed for the input generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Threshold X0 a step must reach to be selectable
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Maximum number of selected steps
    #[arg(long)]
    pub max_active: Option<usize>,

    /// Upper bound of the uniform input draw
    #[arg(long)]
    pub value_max: Option<f64>,

    /// Solver time limit in seconds
    #[arg(long = "time-limit")]
    pub time_limit: Option<u64>,

    /// External solver (cbc, highs)
    #[arg(long)]
    pub solver: Option<SolverId>,
}

impl ConfigArgs {
    /// Build the effective configuration.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(max_active) = self.max_active {
            config.max_active = max_active;
        }
        if let Some(value_max) = self.value_max {
            config.value_max = value_max;
        }
        if let Some(limit) = self.time_limit {
            config.time_limit_secs = limit;
        }
        if let Some(solver) = self.solver {
            config.solver = solver;
        }
        Ok(config)
    }
}
