//! Solver boundary for peakpick.
//!
//! This crate owns everything that touches an external MILP solver: the
//! generic LP/MILP interchange model, the CPLEX LP writer, solver binary
//! discovery, subprocess invocation and the readers for the solution files
//! the solvers write back.
//!
//! # Architecture
//!
//! Solvers run as separate processes. The model is written to a temporary
//! LP file, the solver is pointed at it, and the solution file it leaves
//! behind is parsed into a [`SolverSolution`].
//!
//! ```text
//! peakpick ──model.lp──> cbc / highs (subprocess)
//!          <─model.sol──
//!          <─stdout/stderr── (solver log)
//! ```
//!
//! # Supported Solvers
//!
//! | Solver | Problem Type | Reference |
//! |--------|--------------|-----------|
//! | CBC    | MIP | COIN-OR Branch & Cut |
//! | HiGHS  | LP/MIP | Huangfu & Hall (2018) doi:[10.1007/s12532-017-0130-5] |
//!
//! [10.1007/s12532-017-0130-5]: https://doi.org/10.1007/s12532-017-0130-5

pub mod backend;
pub mod error;
pub mod lp;
pub mod problem;
pub mod solfile;
pub mod solution;
pub mod subprocess;

pub use backend::MilpSolver;
pub use error::{SolverError, SolverResult};
pub use problem::{Column, LpProblem, ObjectiveSense, Row, RowSense, VarDomain};
pub use solution::{SolutionStatus, SolverSolution};
pub use subprocess::SolverProcess;

/// External MILP solvers peakpick knows how to drive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SolverId {
    /// CBC - COIN-OR Branch and Cut for MIP.
    ///
    /// Solves mixed-integer linear programs using branch-and-cut with
    /// cutting planes (Gomory, MIR, clique cuts).
    ///
    /// **Algorithm:** Branch-and-cut with LP relaxation
    /// **Reference:** COIN-OR Foundation. [github.com/coin-or/Cbc](https://github.com/coin-or/Cbc)
    #[default]
    Cbc,

    /// HiGHS - High-performance LP/MIP solver.
    ///
    /// **Algorithm:** Dual revised simplex, interior-point (LP); branch-and-cut (MIP)
    /// **Reference:** Huangfu, Q., & Hall, J. A. J. (2018). Parallelizing the dual
    /// revised simplex method. *Mathematical Programming Computation*, 10(1), 119-142.
    /// **DOI:** [10.1007/s12532-017-0130-5](https://doi.org/10.1007/s12532-017-0130-5)
    Highs,
}

impl SolverId {
    /// Get the binary name for this solver.
    pub fn binary_name(&self) -> &'static str {
        match self {
            SolverId::Cbc => "cbc",
            SolverId::Highs => "highs",
        }
    }

    /// Get the display name for this solver.
    pub fn display_name(&self) -> &'static str {
        match self {
            SolverId::Cbc => "CBC",
            SolverId::Highs => "HiGHS",
        }
    }

    /// Get a description of what this solver does.
    pub fn description(&self) -> &'static str {
        match self {
            SolverId::Cbc => "MIP branch-and-cut",
            SolverId::Highs => "LP/MIP high-performance",
        }
    }

    /// Get all supported solver IDs.
    pub fn all() -> &'static [SolverId] {
        &[SolverId::Cbc, SolverId::Highs]
    }
}

impl std::fmt::Display for SolverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for SolverId {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cbc" => Ok(SolverId::Cbc),
            "highs" => Ok(SolverId::Highs),
            _ => Err(SolverError::UnknownSolver(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_id_parse_is_case_insensitive() {
        assert_eq!("CBC".parse::<SolverId>().unwrap(), SolverId::Cbc);
        assert_eq!("HiGHS".parse::<SolverId>().unwrap(), SolverId::Highs);
    }

    #[test]
    fn test_unknown_solver_rejected() {
        let err = "glpk".parse::<SolverId>().unwrap_err();
        assert!(matches!(err, SolverError::UnknownSolver(ref s) if s == "glpk"));
    }

    #[test]
    fn test_default_solver_is_cbc() {
        assert_eq!(SolverId::default(), SolverId::Cbc);
        assert_eq!(SolverId::default().binary_name(), "cbc");
    }
}
