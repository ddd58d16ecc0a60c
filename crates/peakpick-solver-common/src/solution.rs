//! Solution representation returned from external solvers.

use serde::{Deserialize, Serialize};

/// Termination status reported by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    /// Optimal solution found.
    Optimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Solver stopped on its time limit.
    TimeLimit,
    /// Solver hit an iteration or node limit.
    IterationLimit,
    /// Solver gave up (numerical difficulties, interrupted).
    Error,
    /// Solution status unknown.
    Unknown,
}

impl SolutionStatus {
    /// Check if the solver stopped early on a limit.
    pub fn is_limit(&self) -> bool {
        matches!(self, SolutionStatus::TimeLimit | SolutionStatus::IterationLimit)
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "optimal"),
            SolutionStatus::Infeasible => write!(f, "infeasible"),
            SolutionStatus::Unbounded => write!(f, "unbounded"),
            SolutionStatus::TimeLimit => write!(f, "time_limit"),
            SolutionStatus::IterationLimit => write!(f, "iteration_limit"),
            SolutionStatus::Error => write!(f, "error"),
            SolutionStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// What a solver run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSolution {
    /// Termination status.
    pub status: SolutionStatus,

    /// Objective value as reported by the solver, in the problem's sense.
    pub objective: Option<f64>,

    /// Primal values indexed like `LpProblem::columns`.
    ///
    /// Only meaningful when `has_values` is set.
    pub values: Vec<f64>,

    /// Whether `values` hold a feasible (incumbent) assignment.
    pub has_values: bool,

    /// Wall-clock solve time in milliseconds.
    pub solve_time_ms: i64,

    /// Solver's own status text.
    pub message: Option<String>,
}

impl SolverSolution {
    /// A result that carries no assignment.
    pub fn without_values(status: SolutionStatus, message: &str) -> Self {
        Self {
            status,
            objective: None,
            values: Vec::new(),
            has_values: false,
            solve_time_ms: 0,
            message: Some(message.to_string()),
        }
    }
}

impl Default for SolverSolution {
    fn default() -> Self {
        Self::without_values(SolutionStatus::Unknown, "No solution")
    }
}
