//! Problem representation handed to external solvers.
//!
//! An [`LpProblem`] is a plain linear model: named columns with a domain,
//! a sparse linear objective and named sparse rows. It carries no knowledge
//! of how it was assembled.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveSense {
    Maximize,
    Minimize,
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarDomain {
    /// Continuous, `0 <= v < +inf`.
    NonNegative,
    /// Integer in `{0, 1}`.
    Binary,
}

/// Row comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowSense {
    Le,
    Ge,
    Eq,
}

impl RowSense {
    pub fn as_lp(&self) -> &'static str {
        match self {
            RowSense::Le => "<=",
            RowSense::Ge => ">=",
            RowSense::Eq => "=",
        }
    }
}

/// A decision variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub domain: VarDomain,
}

/// A linear constraint `Σ coef · col  (<=|>=|=)  rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub name: String,
    /// Sparse terms as `(column index, coefficient)`.
    pub terms: Vec<(usize, f64)>,
    pub sense: RowSense,
    pub rhs: f64,
}

impl Row {
    pub fn new(name: impl Into<String>, terms: Vec<(usize, f64)>, sense: RowSense, rhs: f64) -> Self {
        Self {
            name: name.into(),
            terms,
            sense,
            rhs,
        }
    }

    /// Left-hand side activity for a column assignment.
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(col, coef)| coef * values.get(col).copied().unwrap_or(0.0))
            .sum()
    }
}

/// A mixed-integer linear program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpProblem {
    /// Free-form name, written as a comment at the top of the LP file.
    pub name: String,
    pub sense: ObjectiveSense,
    /// Sparse objective as `(column index, coefficient)`.
    pub objective: Vec<(usize, f64)>,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl LpProblem {
    /// Create an empty problem.
    pub fn new(name: impl Into<String>, sense: ObjectiveSense) -> Self {
        Self {
            name: name.into(),
            sense,
            objective: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a column and return its index.
    pub fn add_column(&mut self, name: impl Into<String>, domain: VarDomain) -> usize {
        self.columns.push(Column {
            name: name.into(),
            domain,
        });
        self.columns.len() - 1
    }

    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_binaries(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| c.domain == VarDomain::Binary)
            .count()
    }

    /// Map from column name to column index.
    pub fn column_lookup(&self) -> HashMap<&str, usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, col)| (col.name.as_str(), idx))
            .collect()
    }

    /// Objective value of a column assignment.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|&(col, coef)| coef * values.get(col).copied().unwrap_or(0.0))
            .sum()
    }

    /// Check that the problem can be written as an LP file.
    ///
    /// Names must be unique across columns and rows and use the LP name
    /// alphabet; all coefficients must be finite and refer to existing
    /// columns.
    pub fn validate(&self) -> SolverResult<()> {
        if self.columns.is_empty() {
            return Err(SolverError::InvalidProblem("problem has no columns".into()));
        }

        let mut seen = HashSet::with_capacity(self.columns.len() + self.rows.len());
        let names = self
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.rows.iter().map(|r| r.name.as_str()));
        for name in names {
            if !is_lp_name(name) {
                return Err(SolverError::InvalidProblem(format!(
                    "'{name}' is not a valid LP name"
                )));
            }
            if !seen.insert(name) {
                return Err(SolverError::InvalidProblem(format!(
                    "duplicate name '{name}'"
                )));
            }
        }

        self.check_terms("objective", &self.objective)?;
        for row in &self.rows {
            self.check_terms(&row.name, &row.terms)?;
            if !row.rhs.is_finite() {
                return Err(SolverError::InvalidProblem(format!(
                    "row {} has non-finite rhs {}",
                    row.name, row.rhs
                )));
            }
        }
        Ok(())
    }

    fn check_terms(&self, owner: &str, terms: &[(usize, f64)]) -> SolverResult<()> {
        for &(col, coef) in terms {
            if col >= self.columns.len() {
                return Err(SolverError::InvalidProblem(format!(
                    "{owner} refers to column {col} but only {} exist",
                    self.columns.len()
                )));
            }
            if !coef.is_finite() {
                return Err(SolverError::InvalidProblem(format!(
                    "{owner} has non-finite coefficient {coef} on {}",
                    self.columns[col].name
                )));
            }
        }
        Ok(())
    }
}

/// Names start with a letter or underscore and continue with letters,
/// digits, `_` or `.`.
fn is_lp_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 255 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
