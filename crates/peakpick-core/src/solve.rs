//! Solver invocation and typed outcome.
//!
//! A solve either yields a [`Solution`] (proven optimal, or a time-limited
//! incumbent flagged [`Optimality::SubOptimal`]) or a [`PeakError`]. Partial
//! values from a failed solve never leave this module.

use peakpick_solver_common::{MilpSolver, SolutionStatus, SolverSolution};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{PeakError, PeakResult};
use crate::model::{x_index, y_index, SelectionModel};

/// Distance from 0/1 tolerated when reading binary values.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Relative tolerance when comparing objectives.
pub const OBJECTIVE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Optimality {
    /// Solver proved optimality.
    Optimal,
    /// Best incumbent when a limit stopped the search.
    SubOptimal,
}

/// Solved values for every `x[t]` and `y[t]`.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub optimality: Optimality,
    /// Σ x[t], recomputed from the values.
    pub objective: f64,
    /// Objective as the solver reported it.
    pub reported_objective: Option<f64>,
    pub x: Vec<f64>,
    pub y: Vec<bool>,
    pub solve_time_ms: i64,
}

impl Solution {
    pub fn is_optimal(&self) -> bool {
        self.optimality == Optimality::Optimal
    }

    /// Number of selected steps, Σ y[t].
    pub fn active_count(&self) -> usize {
        self.y.iter().filter(|&&on| on).count()
    }
}

/// Hand `model` to `solver` and interpret the result.
pub fn solve(model: &SelectionModel, solver: &dyn MilpSolver) -> PeakResult<Solution> {
    info!("Solving {} steps with {}", model.steps(), solver.name());
    let raw = solver.solve(model.problem())?;
    interpret(model, raw)
}

/// Map a raw solver answer onto the typed outcome.
pub fn interpret(model: &SelectionModel, raw: SolverSolution) -> PeakResult<Solution> {
    let detail = raw
        .message
        .clone()
        .unwrap_or_else(|| raw.status.to_string());

    match raw.status {
        SolutionStatus::Optimal if raw.has_values => extract(model, raw, Optimality::Optimal),
        SolutionStatus::Optimal => Err(PeakError::SolveError(format!(
            "solver reported optimal but returned no values ({detail})"
        ))),
        SolutionStatus::Infeasible | SolutionStatus::Unbounded => {
            Err(PeakError::SolveInfeasible(raw.status.to_string()))
        }
        status if status.is_limit() => {
            if raw.has_values {
                warn!("{}: returning best incumbent, not proven optimal", detail);
                extract(model, raw, Optimality::SubOptimal)
            } else {
                Err(PeakError::SolveTimeLimit(detail))
            }
        }
        _ => Err(PeakError::SolveError(detail)),
    }
}

fn extract(model: &SelectionModel, raw: SolverSolution, optimality: Optimality) -> PeakResult<Solution> {
    let steps = model.steps();
    let expected = model.problem().num_columns();
    if raw.values.len() != expected {
        return Err(PeakError::SolveError(format!(
            "solver returned {} values for {} columns",
            raw.values.len(),
            expected
        )));
    }

    let x: Vec<f64> = (0..steps)
        .map(|t| {
            let v = raw.values[x_index(t)];
            if v < 0.0 && v > -INTEGRALITY_TOLERANCE {
                0.0
            } else {
                v
            }
        })
        .collect();

    let y = (0..steps)
        .map(|t| {
            let v = raw.values[y_index(steps, t)];
            if (v - 1.0).abs() <= INTEGRALITY_TOLERANCE {
                Ok(true)
            } else if v.abs() <= INTEGRALITY_TOLERANCE {
                Ok(false)
            } else {
                Err(PeakError::SolveError(format!(
                    "y_{t} = {v} is not binary"
                )))
            }
        })
        .collect::<PeakResult<Vec<bool>>>()?;

    let objective: f64 = x.iter().sum();
    if let Some(reported) = raw.objective {
        if !objectives_agree(reported, objective) {
            warn!(
                "Solver reported objective {} but Σx = {}",
                reported, objective
            );
        }
    }

    Ok(Solution {
        optimality,
        objective,
        reported_objective: raw.objective,
        x,
        y,
        solve_time_ms: raw.solve_time_ms,
    })
}

pub(crate) fn objectives_agree(a: f64, b: f64) -> bool {
    (a - b).abs() <= OBJECTIVE_TOLERANCE * b.abs().max(1.0)
}
