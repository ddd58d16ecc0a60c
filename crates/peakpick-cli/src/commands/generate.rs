//! `peakpick generate`: print the seeded input series.

use anyhow::Result;
use peakpick_cli::output::write_series;
use peakpick_cli::{ConfigArgs, OutputFormat};
use peakpick_core::InputSeries;
use std::io;

pub fn handle(config: &ConfigArgs, format: OutputFormat) -> Result<()> {
    let config = config.resolve()?;
    config.validate()?;
    let series = InputSeries::generate(config.seed, config.steps, config.value_max)?;
    write_series(io::stdout().lock(), &series, format)
}
