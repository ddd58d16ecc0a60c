//! Error type for the peakpick pipeline.
//!
//! Configuration problems fail fast before a model exists; solver problems
//! are surfaced as one of the `Solve*` kinds so callers can tell an
//! infeasible model from a solver that never ran.

use peakpick_solver_common::SolverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeakError {
    /// Bad run parameters (N = 0, X0 <= 0, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The external solver is missing or cannot be started.
    #[error("Solver unavailable: {0}")]
    SolverUnavailable(String),

    /// The solver proved the model infeasible (or unbounded).
    #[error("Solve failed: model is {0}")]
    SolveInfeasible(String),

    /// The time limit expired before any feasible solution was found.
    #[error("Solve failed: time limit reached without a feasible solution ({0})")]
    SolveTimeLimit(String),

    /// Any other solver failure.
    #[error("Solve failed: {0}")]
    SolveError(String),

    /// Config file could not be parsed or rendered.
    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PeakError {
    /// Short machine-friendly label used in reports.
    pub fn status_label(&self) -> &'static str {
        match self {
            PeakError::InvalidConfiguration(_) => "invalid_configuration",
            PeakError::SolverUnavailable(_) => "solver_unavailable",
            PeakError::SolveInfeasible(_) => "infeasible",
            PeakError::SolveTimeLimit(_) => "time_limit",
            PeakError::SolveError(_) => "error",
            PeakError::Config(_) => "config_error",
            PeakError::Io(_) => "io_error",
        }
    }
}

impl From<SolverError> for PeakError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::UnknownSolver(_)
            | SolverError::NotInstalled { .. }
            | SolverError::ProcessStart(_) => PeakError::SolverUnavailable(err.to_string()),
            SolverError::Timeout { .. } => PeakError::SolveTimeLimit(err.to_string()),
            other => PeakError::SolveError(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for PeakError {
    fn from(err: toml::de::Error) -> Self {
        PeakError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for PeakError {
    fn from(err: toml::ser::Error) -> Self {
        PeakError::Config(err.to_string())
    }
}

pub type PeakResult<T> = Result<T, PeakError>;
