//! Check a solution against the model it claims to solve.
//!
//! The solver is an external process; nothing guarantees the values it
//! writes back respect the model. [`verify`] re-checks every constraint
//! family plus the reported objective.

use serde::Serialize;

use crate::model::SelectionModel;
use crate::solve::{objectives_agree, Solution};

/// Absolute tolerance used by the CLI.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Solution length differs from the model.
    LengthMismatch { expected: usize, actual: usize },
    /// `x[t] < 0`.
    NegativeX { t: usize, x: f64 },
    /// `x[t] > X_in[t]`.
    ExceedsInput { t: usize, x: f64, x_in: f64 },
    /// `x[t] > 0` while `y[t] = 0`.
    UnselectedFlow { t: usize, x: f64 },
    /// `y[t] = 1` while `X_in[t] < X0`.
    BelowThreshold { t: usize, x_in: f64, threshold: f64 },
    /// `Σ y > max_active`.
    TooManyActive { count: usize, limit: usize },
    /// Reported objective disagrees with Σ x.
    ObjectiveMismatch { reported: f64, recomputed: f64 },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::LengthMismatch { expected, actual } => {
                write!(f, "solution has {actual} steps, model has {expected}")
            }
            Violation::NegativeX { t, x } => write!(f, "x[{t}] = {x} is negative"),
            Violation::ExceedsInput { t, x, x_in } => {
                write!(f, "x[{t}] = {x} exceeds X_in[{t}] = {x_in}")
            }
            Violation::UnselectedFlow { t, x } => write!(f, "x[{t}] = {x} but y[{t}] = 0"),
            Violation::BelowThreshold { t, x_in, threshold } => {
                write!(f, "y[{t}] = 1 but X_in[{t}] = {x_in} < X0 = {threshold}")
            }
            Violation::TooManyActive { count, limit } => {
                write!(f, "{count} steps active, limit is {limit}")
            }
            Violation::ObjectiveMismatch {
                reported,
                recomputed,
            } => write!(f, "reported objective {reported} but Σx = {recomputed}"),
        }
    }
}

/// Return every violated property; empty means the solution is consistent.
pub fn verify(model: &SelectionModel, solution: &Solution, tol: f64) -> Vec<Violation> {
    let steps = model.steps();
    if solution.x.len() != steps || solution.y.len() != steps {
        return vec![Violation::LengthMismatch {
            expected: steps,
            actual: solution.x.len().min(solution.y.len()),
        }];
    }

    let threshold = model.params().threshold;
    let mut violations = Vec::new();

    for (t, x_in) in model.input().iter() {
        let x = solution.x[t];
        let y = solution.y[t];
        if x < -tol {
            violations.push(Violation::NegativeX { t, x });
        }
        if x > x_in + tol {
            violations.push(Violation::ExceedsInput { t, x, x_in });
        }
        if !y && x > tol {
            violations.push(Violation::UnselectedFlow { t, x });
        }
        if y && x_in + tol < threshold {
            violations.push(Violation::BelowThreshold { t, x_in, threshold });
        }
    }

    let count = solution.active_count();
    let limit = model.params().max_active;
    if count > limit {
        violations.push(Violation::TooManyActive { count, limit });
    }

    if let Some(reported) = solution.reported_objective {
        if !objectives_agree(reported, solution.objective) {
            violations.push(Violation::ObjectiveMismatch {
                reported,
                recomputed: solution.objective,
            });
        }
    }

    violations
}
