//! Error types for solver communication.

use thiserror::Error;

/// Errors that can occur during solver operations.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Unknown solver ID.
    #[error("Unknown solver: {0}")]
    UnknownSolver(String),

    /// Solver binary could not be found.
    #[error("Solver {solver} is not installed. Put `{binary}` on PATH or in ~/.peakpick/solvers")]
    NotInstalled {
        solver: crate::SolverId,
        binary: String,
    },

    /// The problem cannot be written as an LP file.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// Solver process failed to start.
    #[error("Failed to start solver process: {0}")]
    ProcessStart(#[source] std::io::Error),

    /// Solver process exited unsuccessfully.
    #[error("Solver process failed with exit code {code:?}: {message}")]
    ProcessFailed { code: Option<i32>, message: String },

    /// Watchdog expired while waiting for the solver.
    #[error("Solver timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Solution file missing or unreadable.
    #[error("Solution file error: {0}")]
    SolutionFile(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;
