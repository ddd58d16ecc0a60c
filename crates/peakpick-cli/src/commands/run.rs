//! `peakpick run`: generate, solve, verify and report.

use anyhow::{bail, Result};
use peakpick_cli::output::{write_plot_series, write_report, ReportView};
use peakpick_cli::RunArgs;
use peakpick_core::report::parse_columns;
use peakpick_core::{pipeline, PeakError};
use peakpick_solver_common::SolverProcess;
use std::io;
use tracing::{info, warn};

pub fn handle(args: &RunArgs) -> Result<()> {
    let config = args.config.resolve()?;
    config.validate()?;
    let columns = parse_columns(&args.columns)?;

    let solver = SolverProcess::locate(config.solver, config.time_limit_secs)
        .map_err(PeakError::from)?
        .with_tee(args.tee);
    info!(
        "Running {} steps with {} (time limit {}s)",
        config.steps, config.solver, config.time_limit_secs
    );

    let result = pipeline::run(&config, &solver)?;
    let report = result.report();

    let view = ReportView {
        report: &report,
        columns: &columns,
        active_only: args.active_only,
        violations: &result.violations,
    };
    write_report(io::stdout().lock(), &view, args.format)?;

    if let Some(path) = &args.plot {
        if report.is_success() {
            let points = write_plot_series(path, &report)?;
            info!("Wrote {} plot points to {}", points, path.display());
        } else {
            warn!("No solution to plot; {} not written", path.display());
        }
    }

    if let Err(err) = result.outcome {
        return Err(err.into());
    }
    if args.strict && !result.violations.is_empty() {
        bail!(
            "solution failed {} consistency check(s)",
            result.violations.len()
        );
    }
    Ok(())
}
