//! Readers for the solution files written by external solvers.
//!
//! Both readers map values back onto `LpProblem::columns` by name. Columns a
//! solver leaves out of its file are zero; names that are not columns (row
//! activities) are skipped.

use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::problem::{LpProblem, ObjectiveSense};
use crate::solution::{SolutionStatus, SolverSolution};

/// Parse a CBC `-solu` file.
///
/// ```text
/// Optimal - objective value -65.00000000
///       0 x_0                      0                       1
///       1 x_1                     20                       1
/// **    4 y_3                      1                       0
/// ```
///
/// CBC minimizes internally and, depending on the build, may report the
/// objective of the negated problem for a maximization. The sign is settled
/// against the objective recomputed from the values; without usable values a
/// maximization objective is negated.
pub fn read_cbc(text: &str, problem: &LpProblem) -> SolverResult<SolverSolution> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| SolverError::SolutionFile("CBC solution file is empty".into()))?
        .trim();

    let (status, has_values) = cbc_status(header);
    let raw_objective = header
        .rsplit_once("objective value")
        .and_then(|(_, tail)| tail.trim().parse::<f64>().ok());

    let lookup = problem.column_lookup();
    let mut values = vec![0.0; problem.num_columns()];
    let mut skipped = 0usize;

    for line in lines {
        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.first() == Some(&"**") {
            tokens.remove(0);
        }
        if tokens.len() < 3 {
            return Err(SolverError::SolutionFile(format!(
                "malformed CBC solution line: '{line}'"
            )));
        }
        let value: f64 = tokens[2].parse().map_err(|_| {
            SolverError::SolutionFile(format!("bad value '{}' in line '{line}'", tokens[2]))
        })?;
        match lookup.get(tokens[1]) {
            Some(&idx) => values[idx] = value,
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} non-column entries in CBC solution", skipped);
    }

    let objective = raw_objective.map(|v| match problem.sense {
        ObjectiveSense::Minimize => v,
        ObjectiveSense::Maximize if has_values => {
            let recomputed = problem.objective_value(&values);
            if (v - recomputed).abs() < (v + recomputed).abs() {
                v
            } else {
                -v
            }
        }
        ObjectiveSense::Maximize => -v,
    });

    Ok(SolverSolution {
        status,
        objective,
        values,
        has_values,
        solve_time_ms: 0,
        message: Some(header.to_string()),
    })
}

/// Map the CBC header line onto a status and whether values are usable.
fn cbc_status(header: &str) -> (SolutionStatus, bool) {
    let lower = header.to_lowercase();
    if lower.starts_with("optimal") {
        (SolutionStatus::Optimal, true)
    } else if lower.contains("infeasible") {
        (SolutionStatus::Infeasible, false)
    } else if lower.contains("unbounded") {
        (SolutionStatus::Unbounded, false)
    } else if lower.starts_with("stopped on time") {
        // "(no integer solution - continuous used)" means the values are the
        // LP relaxation, not an incumbent.
        (SolutionStatus::TimeLimit, !lower.contains("no integer solution"))
    } else if lower.starts_with("stopped on iterations")
        || lower.starts_with("stopped on nodes")
        || lower.starts_with("stopped on solutions")
    {
        (
            SolutionStatus::IterationLimit,
            !lower.contains("no integer solution"),
        )
    } else if lower.starts_with("stopped") {
        (SolutionStatus::Error, false)
    } else {
        (SolutionStatus::Unknown, false)
    }
}

/// Parse a HiGHS `--solution_file` file.
///
/// ```text
/// Model status
/// Optimal
///
/// # Primal solution values
/// Feasible
/// Objective 65
/// # Columns 2
/// x_0 0
/// x_1 20
/// # Rows 1
/// ...
/// ```
///
/// Only the first `# Columns` block (primal values) is read.
pub fn read_highs(text: &str, problem: &LpProblem) -> SolverResult<SolverSolution> {
    let mut lines = text.lines().map(str::trim);
    let mut status = None;
    let mut message = None;
    let mut objective = None;
    let mut primal_feasible = false;
    let mut values = vec![0.0; problem.num_columns()];
    let mut read_columns = false;
    let lookup = problem.column_lookup();

    while let Some(line) = lines.next() {
        if line == "Model status" {
            let status_line = lines.by_ref().find(|l| !l.is_empty()).unwrap_or_default();
            status = Some(highs_status(status_line));
            message = Some(status_line.to_string());
        } else if line == "# Primal solution values" {
            primal_feasible = lines.next() == Some("Feasible");
        } else if let Some(rest) = line.strip_prefix("Objective ") {
            if objective.is_none() {
                objective = rest.trim().parse::<f64>().ok();
            }
        } else if let Some(rest) = line.strip_prefix("# Columns ") {
            if read_columns {
                break;
            }
            read_columns = true;
            let count: usize = rest.trim().parse().map_err(|_| {
                SolverError::SolutionFile(format!("bad column count in '{line}'"))
            })?;
            for _ in 0..count {
                let entry = lines.next().ok_or_else(|| {
                    SolverError::SolutionFile("HiGHS solution truncated in column block".into())
                })?;
                let mut parts = entry.split_whitespace();
                let (Some(name), Some(raw)) = (parts.next(), parts.next()) else {
                    return Err(SolverError::SolutionFile(format!(
                        "malformed HiGHS column line: '{entry}'"
                    )));
                };
                let value: f64 = raw.parse().map_err(|_| {
                    SolverError::SolutionFile(format!("bad value '{raw}' in line '{entry}'"))
                })?;
                if let Some(&idx) = lookup.get(name) {
                    values[idx] = value;
                }
            }
        }
    }

    let status = status
        .ok_or_else(|| SolverError::SolutionFile("HiGHS solution has no model status".into()))?;
    let has_values = primal_feasible && read_columns;

    Ok(SolverSolution {
        status,
        objective: if has_values { objective } else { None },
        values,
        has_values,
        solve_time_ms: 0,
        message,
    })
}

fn highs_status(text: &str) -> SolutionStatus {
    match text.to_lowercase().as_str() {
        "optimal" => SolutionStatus::Optimal,
        "infeasible" => SolutionStatus::Infeasible,
        "unbounded" | "primal infeasible or unbounded" => SolutionStatus::Unbounded,
        "time limit reached" => SolutionStatus::TimeLimit,
        "iteration limit reached" | "solution limit reached" => SolutionStatus::IterationLimit,
        "load error" | "model error" | "presolve error" | "solve error" | "postsolve error" => {
            SolutionStatus::Error
        }
        _ => SolutionStatus::Unknown,
    }
}
