//! CPLEX LP file writer.
//!
//! The LP format is the interchange form every supported solver reads:
//!
//! ```text
//! \ name
//! Maximize
//!  obj: x_0 + x_1
//! Subject To
//!  x_lim_0: x_0 <= 5
//!  x_y_0: x_0 - 30 y_0 <= 0
//! Bounds
//!  0 <= y_0 <= 1
//! Binaries
//!  y_0
//! End
//! ```
//!
//! Long expressions are wrapped onto continuation lines so no line exceeds
//! what older LP readers accept.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SolverResult;
use crate::problem::{LpProblem, ObjectiveSense, VarDomain};

/// Terms written per line before wrapping.
const TERMS_PER_LINE: usize = 8;

/// Write `problem` in CPLEX LP format.
pub fn write_lp<W: Write>(problem: &LpProblem, mut out: W) -> SolverResult<()> {
    problem.validate()?;

    writeln!(out, "\\ {}", problem.name)?;
    match problem.sense {
        ObjectiveSense::Maximize => writeln!(out, "Maximize")?,
        ObjectiveSense::Minimize => writeln!(out, "Minimize")?,
    }
    write!(out, " obj:")?;
    write_expr(&mut out, problem, &problem.objective)?;
    writeln!(out)?;

    writeln!(out, "Subject To")?;
    for row in &problem.rows {
        write!(out, " {}:", row.name)?;
        write_expr(&mut out, problem, &row.terms)?;
        writeln!(out, " {} {}", row.sense.as_lp(), fmt_num(row.rhs))?;
    }

    let binaries: Vec<&str> = problem
        .columns
        .iter()
        .filter(|c| c.domain == VarDomain::Binary)
        .map(|c| c.name.as_str())
        .collect();

    if !binaries.is_empty() {
        writeln!(out, "Bounds")?;
        for name in &binaries {
            writeln!(out, " 0 <= {name} <= 1")?;
        }
        writeln!(out, "Binaries")?;
        for name in &binaries {
            writeln!(out, " {name}")?;
        }
    }

    writeln!(out, "End")?;
    out.flush()?;
    Ok(())
}

/// Write `problem` to an LP file at `path`.
pub fn write_lp_file(problem: &LpProblem, path: &Path) -> SolverResult<()> {
    let file = File::create(path)?;
    write_lp(problem, BufWriter::new(file))
}

/// Render `problem` as an LP string.
pub fn to_lp_string(problem: &LpProblem) -> SolverResult<String> {
    let mut buf = Vec::new();
    write_lp(problem, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_expr<W: Write>(out: &mut W, problem: &LpProblem, terms: &[(usize, f64)]) -> SolverResult<()> {
    if terms.is_empty() {
        // LP readers need at least one term; validate() guarantees a column.
        write!(out, " 0 {}", problem.columns[0].name)?;
        return Ok(());
    }

    for (i, &(col, coef)) in terms.iter().enumerate() {
        if i > 0 && i % TERMS_PER_LINE == 0 {
            write!(out, "\n  ")?;
        }
        let name = &problem.columns[col].name;
        let sign = if coef < 0.0 { "-" } else { "+" };
        let magnitude = coef.abs();
        match (i, magnitude == 1.0) {
            (0, true) if sign == "+" => write!(out, " {name}")?,
            (0, true) => write!(out, " - {name}")?,
            (0, false) if sign == "+" => write!(out, " {} {name}", fmt_num(magnitude))?,
            (0, false) => write!(out, " - {} {name}", fmt_num(magnitude))?,
            (_, true) => write!(out, " {sign} {name}")?,
            (_, false) => write!(out, " {sign} {} {name}", fmt_num(magnitude))?,
        }
    }
    Ok(())
}

/// Shortest round-trip decimal; never scientific notation.
fn fmt_num(v: f64) -> String {
    if v == 0.0 {
        // avoids "-0"
        "0".to_string()
    } else {
        format!("{v}")
    }
}
