//! The seam between model code and whatever actually solves the model.
//!
//! # Usage
//!
//! ```rust,ignore
//! use peakpick_solver_common::{LpProblem, MilpSolver, SolverResult, SolverSolution};
//!
//! struct Recorded(SolverSolution);
//!
//! impl MilpSolver for Recorded {
//!     fn name(&self) -> &str { "recorded" }
//!     fn solve(&self, _problem: &LpProblem) -> SolverResult<SolverSolution> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

use crate::error::SolverResult;
use crate::problem::LpProblem;
use crate::solution::SolverSolution;

/// Anything that can solve an [`LpProblem`].
///
/// [`crate::SolverProcess`] implements this by driving an external binary.
/// Implementations block until the solver returns.
pub trait MilpSolver {
    /// Human-readable solver name for logs and reports.
    fn name(&self) -> &str;

    /// Solve the problem.
    ///
    /// Non-optimal terminations (infeasible, time limit) are reported through
    /// `SolverSolution::status`; `Err` is reserved for failures to run the
    /// solver or read its answer.
    fn solve(&self, problem: &LpProblem) -> SolverResult<SolverSolution>;
}
