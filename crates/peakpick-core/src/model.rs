//! Threshold selection model.
//!
//! Over time steps `t ∈ T = 0..N`:
//!
//! ```text
//! maximize   Σ_t x[t]
//! subject to x[t] <= X_in[t]              (x_lim_t)
//!            x[t] <= XM · y[t]            (x_y_t)
//!            y[t] <= X_in[t] / X0         (y_x0_t)
//!            Σ_t y[t] <= max_active       (n_active)
//!            x[t] >= 0, y[t] ∈ {0, 1}
//! ```
//!
//! with `XM = max_t X_in[t]`. Each constraint family is produced by a pure
//! rule function of `(t, data)`; [`SelectionModel::assemble`] only strings
//! them together.

use peakpick_solver_common::{LpProblem, ObjectiveSense, Row, RowSense, VarDomain};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::InputSeries;
use crate::error::{PeakError, PeakResult};

/// Scalar model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// X0.
    pub threshold: f64,
    /// Cap on Σ y.
    pub max_active: usize,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            max_active: 100,
        }
    }
}

/// Column index of `x[t]`.
pub fn x_index(t: usize) -> usize {
    t
}

/// Column index of `y[t]`.
pub fn y_index(steps: usize, t: usize) -> usize {
    steps + t
}

pub fn objective_terms(steps: usize) -> Vec<(usize, f64)> {
    (0..steps).map(|t| (x_index(t), 1.0)).collect()
}

/// `x[t] <= X_in[t]`
pub fn x_limit_row(t: usize, x_in: f64) -> Row {
    Row::new(format!("x_lim_{t}"), vec![(x_index(t), 1.0)], RowSense::Le, x_in)
}

/// `x[t] - XM · y[t] <= 0`
pub fn x_y_link_row(t: usize, steps: usize, x_max: f64) -> Row {
    Row::new(
        format!("x_y_{t}"),
        vec![(x_index(t), 1.0), (y_index(steps, t), -x_max)],
        RowSense::Le,
        0.0,
    )
}

/// `y[t] <= X_in[t] / X0`
pub fn y_threshold_row(t: usize, steps: usize, x_in: f64, threshold: f64) -> Row {
    Row::new(
        format!("y_x0_{t}"),
        vec![(y_index(steps, t), 1.0)],
        RowSense::Le,
        x_in / threshold,
    )
}

/// `Σ_t y[t] <= max_active`
pub fn active_cap_row(steps: usize, max_active: usize) -> Row {
    Row::new(
        "n_active",
        (0..steps).map(|t| (y_index(steps, t), 1.0)).collect(),
        RowSense::Le,
        max_active as f64,
    )
}

/// A fully parameterised model, ready to hand to a solver.
#[derive(Debug, Clone)]
pub struct SelectionModel {
    input: InputSeries,
    params: ModelParams,
    x_max: f64,
    problem: LpProblem,
}

impl SelectionModel {
    /// Build the model for `input`.
    ///
    /// Fails with `InvalidConfiguration` on an empty series, a non-positive
    /// or non-finite threshold, or non-finite / negative inputs.
    pub fn assemble(input: InputSeries, params: ModelParams) -> PeakResult<Self> {
        if input.is_empty() {
            return Err(PeakError::InvalidConfiguration(
                "input series must contain at least one time step".into(),
            ));
        }
        if !params.threshold.is_finite() || params.threshold <= 0.0 {
            return Err(PeakError::InvalidConfiguration(format!(
                "threshold must be a positive number, got {}",
                params.threshold
            )));
        }
        if let Some((t, v)) = input.iter().find(|&(_, v)| !v.is_finite() || v < 0.0) {
            return Err(PeakError::InvalidConfiguration(format!(
                "input at t={t} must be a finite non-negative number, got {v}"
            )));
        }

        let steps = input.len();
        let x_max = input.max().unwrap_or(0.0);

        let mut problem = LpProblem::new("peakpick threshold selection", ObjectiveSense::Maximize);
        for t in 0..steps {
            problem.add_column(format!("x_{t}"), VarDomain::NonNegative);
        }
        for t in 0..steps {
            problem.add_column(format!("y_{t}"), VarDomain::Binary);
        }
        problem.objective = objective_terms(steps);

        for (t, x_in) in input.iter() {
            problem.add_row(x_limit_row(t, x_in));
        }
        for t in 0..steps {
            problem.add_row(x_y_link_row(t, steps, x_max));
        }
        for (t, x_in) in input.iter() {
            problem.add_row(y_threshold_row(t, steps, x_in, params.threshold));
        }
        problem.add_row(active_cap_row(steps, params.max_active));

        debug!(
            "Assembled model: {} steps, XM={:.3}, X0={}, cap={}, {} rows",
            steps,
            x_max,
            params.threshold,
            params.max_active,
            problem.num_rows()
        );

        Ok(Self {
            input,
            params,
            x_max,
            problem,
        })
    }

    pub fn problem(&self) -> &LpProblem {
        &self.problem
    }

    pub fn input(&self) -> &InputSeries {
        &self.input
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// XM, the largest input value.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn steps(&self) -> usize {
        self.input.len()
    }
}
