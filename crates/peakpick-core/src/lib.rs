//! Threshold selection over a synthetic time series.
//!
//! Given an input series `X_in[t]`, choose at most `max_active` time steps
//! whose input reaches the threshold `X0` and maximise the total flow taken
//! at the chosen steps. The problem is a small MILP:
//!
//! - [`data`] draws the seeded input series
//! - [`model`] assembles the LP/MILP from pure per-step rules
//! - [`solve`] hands it to an external solver and types the outcome
//! - [`verify`] re-checks the returned values against the model
//! - [`report`] turns the outcome into rows and a summary
//! - [`pipeline`] strings the stages together from a [`RunConfig`]

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod solve;
pub mod verify;

#[cfg(test)]
mod testing;

pub use config::RunConfig;
pub use data::InputSeries;
pub use error::{PeakError, PeakResult};
pub use model::{ModelParams, SelectionModel};
pub use pipeline::{prepare, run, RunResult};
pub use report::{Report, ReportColumn, ReportRow, Summary};
pub use solve::{Optimality, Solution};
pub use verify::Violation;
