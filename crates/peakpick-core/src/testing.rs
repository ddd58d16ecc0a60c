//! In-process stand-ins for an external solver, used by unit tests.

use std::collections::HashMap;

use peakpick_solver_common::{
    LpProblem, MilpSolver, SolutionStatus, SolverResult, SolverSolution,
};

/// Exact optimum of a selection model, read back from its LP rows.
///
/// The optimum selects the `max_active` largest inputs whose threshold row
/// allows `y = 1` and sets `x` to the input there.
pub(crate) struct OracleSolver;

impl MilpSolver for OracleSolver {
    fn name(&self) -> &str {
        "oracle"
    }

    fn solve(&self, problem: &LpProblem) -> SolverResult<SolverSolution> {
        let steps = problem.num_columns() / 2;
        let rhs: HashMap<&str, f64> = problem
            .rows
            .iter()
            .map(|r| (r.name.as_str(), r.rhs))
            .collect();
        let cap = rhs.get("n_active").copied().unwrap_or(f64::INFINITY);

        let mut eligible: Vec<(usize, f64)> = (0..steps)
            .filter_map(|t| {
                let x_in = rhs[format!("x_lim_{t}").as_str()];
                let y_bound = rhs[format!("y_x0_{t}").as_str()];
                (y_bound >= 1.0 && x_in > 0.0).then_some((t, x_in))
            })
            .collect();
        eligible.sort_by(|a, b| b.1.total_cmp(&a.1));
        eligible.truncate(cap as usize);

        let mut values = vec![0.0; problem.num_columns()];
        for &(t, x_in) in &eligible {
            values[t] = x_in;
            values[steps + t] = 1.0;
        }
        let objective = problem.objective_value(&values);

        Ok(SolverSolution {
            status: SolutionStatus::Optimal,
            objective: Some(objective),
            values,
            has_values: true,
            solve_time_ms: 0,
            message: Some("oracle".into()),
        })
    }
}

/// Returns a fixed answer regardless of the problem.
pub(crate) struct Scripted(SolverSolution);

impl Scripted {
    pub(crate) fn status(status: SolutionStatus) -> Self {
        Self(SolverSolution::without_values(status, "scripted"))
    }

    pub(crate) fn with_values(status: SolutionStatus, values: Vec<f64>, objective: Option<f64>) -> Self {
        Self(SolverSolution {
            status,
            objective,
            values,
            has_values: true,
            solve_time_ms: 0,
            message: Some("scripted".into()),
        })
    }
}

impl MilpSolver for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn solve(&self, _problem: &LpProblem) -> SolverResult<SolverSolution> {
        Ok(self.0.clone())
    }
}
