//! Report rows, columns and summary.
//!
//! Columns are looked up in a fixed registry that maps a column name to an
//! accessor function, so an unknown name is an error up front instead of a
//! silent fallback while printing.

use serde::Serialize;

use crate::data::InputSeries;
use crate::error::{PeakError, PeakResult};
use crate::model::ModelParams;
use crate::solve::Solution;

/// Default column selection.
pub const DEFAULT_COLUMNS: &str = "X_in x y";

/// One time step of a solved run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportRow {
    pub t: usize,
    #[serde(rename = "X_in")]
    pub x_in: f64,
    pub x: f64,
    pub y: bool,
}

/// A named numeric view of a [`ReportRow`].
#[derive(Debug)]
pub struct ReportColumn {
    pub name: &'static str,
    pub accessor: fn(&ReportRow) -> f64,
    /// Decimals used in the table view.
    pub precision: usize,
}

impl ReportColumn {
    pub fn value(&self, row: &ReportRow) -> f64 {
        (self.accessor)(row)
    }
}

pub static COLUMNS: &[ReportColumn] = &[
    ReportColumn {
        name: "X_in",
        accessor: |r| r.x_in,
        precision: 1,
    },
    ReportColumn {
        name: "x",
        accessor: |r| r.x,
        precision: 1,
    },
    ReportColumn {
        name: "y",
        accessor: |r| if r.y { 1.0 } else { 0.0 },
        precision: 0,
    },
];

pub fn column(name: &str) -> Option<&'static ReportColumn> {
    COLUMNS.iter().find(|c| c.name == name)
}

/// Parse a space- or comma-separated column list such as `"X_in x y"`.
pub fn parse_columns(list: &str) -> PeakResult<Vec<&'static ReportColumn>> {
    let columns = list
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|name| {
            column(name).ok_or_else(|| {
                let known: Vec<&str> = COLUMNS.iter().map(|c| c.name).collect();
                PeakError::InvalidConfiguration(format!(
                    "unknown report column '{name}' (known: {})",
                    known.join(", ")
                ))
            })
        })
        .collect::<PeakResult<Vec<_>>>()?;

    if columns.is_empty() {
        return Err(PeakError::InvalidConfiguration(
            "at least one report column is required".into(),
        ));
    }
    Ok(columns)
}

/// Headline numbers of a run, present whether or not the solve succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// `optimal`, `sub_optimal` or the failure label.
    pub status: String,
    pub steps: usize,
    pub threshold: f64,
    pub max_active: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solve_time_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A point of the input-vs-solution chart; `reference` is the X0 line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub t: usize,
    #[serde(rename = "X_in")]
    pub x_in: f64,
    pub x: f64,
    #[serde(rename = "X0")]
    pub reference: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: Summary,
    /// Empty when the solve failed.
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Build a report from a solve outcome.
    ///
    /// A failed outcome yields a summary carrying the failure and no rows.
    pub fn from_outcome(
        input: &InputSeries,
        params: &ModelParams,
        outcome: &PeakResult<Solution>,
    ) -> Self {
        let mut summary = Summary {
            status: String::new(),
            steps: input.len(),
            threshold: params.threshold,
            max_active: params.max_active,
            objective: None,
            active: None,
            solve_time_ms: None,
            message: None,
        };

        match outcome {
            Ok(solution) => {
                summary.status = if solution.is_optimal() {
                    "optimal".into()
                } else {
                    "sub_optimal".into()
                };
                summary.objective = Some(solution.objective);
                summary.active = Some(solution.active_count());
                summary.solve_time_ms = Some(solution.solve_time_ms);
                let rows = input
                    .iter()
                    .zip(solution.x.iter().zip(&solution.y))
                    .map(|((t, x_in), (&x, &y))| ReportRow { t, x_in, x, y })
                    .collect();
                Self { summary, rows }
            }
            Err(err) => {
                summary.status = err.status_label().into();
                summary.message = Some(err.to_string());
                Self {
                    summary,
                    rows: Vec::new(),
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.summary.status.as_str(), "optimal" | "sub_optimal")
    }

    /// Rows with `y = 1`.
    pub fn active_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|r| r.y)
    }

    /// Series for charting X_in and x over t against the X0 line.
    pub fn plot_series(&self) -> impl Iterator<Item = PlotPoint> + '_ {
        let reference = self.summary.threshold;
        self.rows.iter().map(move |r| PlotPoint {
            t: r.t,
            x_in: r.x_in,
            x: r.x,
            reference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve::Optimality;

    fn input() -> InputSeries {
        InputSeries::from_values(vec![5.0, 20.0, 15.0, 8.0, 30.0])
    }

    fn params() -> ModelParams {
        ModelParams {
            threshold: 10.0,
            max_active: 100,
        }
    }

    fn solved() -> PeakResult<Solution> {
        Ok(Solution {
            optimality: Optimality::Optimal,
            objective: 65.0,
            reported_objective: Some(65.0),
            x: vec![0.0, 20.0, 15.0, 0.0, 30.0],
            y: vec![false, true, true, false, true],
            solve_time_ms: 12,
        })
    }

    #[test]
    fn test_parse_default_columns() {
        let cols = parse_columns(DEFAULT_COLUMNS).unwrap();
        let names: Vec<&str> = cols.iter().map(|c| c.name).collect();
        assert_eq!(names, ["X_in", "x", "y"]);
    }

    #[test]
    fn test_parse_columns_accepts_commas_and_order() {
        let cols = parse_columns("y,x").unwrap();
        assert_eq!(cols[0].name, "y");
        assert_eq!(cols[1].name, "x");
    }

    #[test]
    fn test_unknown_column_is_error() {
        let err = parse_columns("X_in z").unwrap_err();
        assert!(matches!(err, PeakError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("'z'"));
        assert!(parse_columns("  ").is_err());
    }

    #[test]
    fn test_accessors() {
        let row = ReportRow {
            t: 1,
            x_in: 20.0,
            x: 19.5,
            y: true,
        };
        assert_eq!(column("X_in").unwrap().value(&row), 20.0);
        assert_eq!(column("x").unwrap().value(&row), 19.5);
        assert_eq!(column("y").unwrap().value(&row), 1.0);
    }

    #[test]
    fn test_report_from_solution() {
        let report = Report::from_outcome(&input(), &params(), &solved());
        assert!(report.is_success());
        assert_eq!(report.summary.status, "optimal");
        assert_eq!(report.summary.objective, Some(65.0));
        assert_eq!(report.summary.active, Some(3));
        assert_eq!(report.rows.len(), 5);
        let active: Vec<usize> = report.active_rows().map(|r| r.t).collect();
        assert_eq!(active, [1, 2, 4]);
    }

    #[test]
    fn test_report_from_sub_optimal_keeps_rows() {
        let outcome = solved().map(|s| Solution {
            optimality: Optimality::SubOptimal,
            ..s
        });
        let report = Report::from_outcome(&input(), &params(), &outcome);
        assert!(report.is_success());
        assert_eq!(report.summary.status, "sub_optimal");
        assert_eq!(report.summary.objective, Some(65.0));
        assert_eq!(report.rows.len(), 5);
        assert!(report.summary.message.is_none());
    }

    #[test]
    fn test_report_from_failure_has_no_rows() {
        let outcome: PeakResult<Solution> = Err(PeakError::SolveTimeLimit("stopped".into()));
        let report = Report::from_outcome(&input(), &params(), &outcome);
        assert!(!report.is_success());
        assert_eq!(report.summary.status, "time_limit");
        assert!(report.rows.is_empty());
        assert!(report.summary.objective.is_none());
        assert_eq!(report.plot_series().count(), 0);
    }

    #[test]
    fn test_plot_series_carries_reference_line() {
        let report = Report::from_outcome(&input(), &params(), &solved());
        let points: Vec<PlotPoint> = report.plot_series().collect();
        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| p.reference == 10.0));
        assert_eq!(points[4].x, 30.0);
    }
}
