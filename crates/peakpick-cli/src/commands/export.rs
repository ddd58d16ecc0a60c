//! `peakpick export`: write the LP file without solving.

use anyhow::{Context, Result};
use peakpick_cli::ConfigArgs;
use peakpick_core::pipeline;
use peakpick_solver_common::lp::write_lp_file;
use std::path::Path;

pub fn handle(config: &ConfigArgs, output: &Path) -> Result<()> {
    let config = config.resolve()?;
    let model = pipeline::prepare(&config)?;
    write_lp_file(model.problem(), output)
        .with_context(|| format!("writing LP file {}", output.display()))?;
    let problem = model.problem();
    println!(
        "Wrote {} ({} columns, {} binaries, {} rows)",
        output.display(),
        problem.num_columns(),
        problem.num_binaries(),
        problem.num_rows()
    );
    Ok(())
}
