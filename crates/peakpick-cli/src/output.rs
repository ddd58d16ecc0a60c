//! Report and series renderers.
//!
//! Everything here writes to a caller-supplied writer; the commands pass
//! stdout so the output can be piped, while logs go to stderr.

use anyhow::{Context, Result};
use peakpick_core::report::{Report, ReportColumn, ReportRow};
use peakpick_core::{InputSeries, Violation};
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tabwriter::TabWriter;

use crate::common::OutputFormat;

/// What a report view shows.
pub struct ReportView<'a> {
    pub report: &'a Report,
    pub columns: &'a [&'static ReportColumn],
    pub active_only: bool,
    pub violations: &'a [Violation],
}

impl ReportView<'_> {
    fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        let active_only = self.active_only;
        self.report.rows.iter().filter(move |r| !active_only || r.y)
    }
}

pub fn write_report<W: Write>(out: W, view: &ReportView<'_>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(out, view),
        OutputFormat::Csv => write_csv(out, view),
        OutputFormat::Json => write_json(out, view),
    }
}

/// Summary block followed by an aligned table of the selected columns.
pub fn write_table<W: Write>(mut out: W, view: &ReportView<'_>) -> Result<()> {
    let summary = &view.report.summary;
    writeln!(out, "Status      : {}", summary.status)?;
    if let Some(objective) = summary.objective {
        writeln!(out, "Objective   : {objective:.3}")?;
    }
    if let Some(active) = summary.active {
        writeln!(
            out,
            "Active      : {} of {} steps (cap {}, X0 = {})",
            active, summary.steps, summary.max_active, summary.threshold
        )?;
    }
    if let Some(ms) = summary.solve_time_ms {
        writeln!(out, "Solve time  : {ms} ms")?;
    }
    if let Some(message) = &summary.message {
        writeln!(out, "Message     : {message}")?;
    }
    if !view.violations.is_empty() {
        writeln!(out, "Violations  : {}", view.violations.len())?;
    }
    if view.report.rows.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    let mut writer = TabWriter::new(out);
    let header: Vec<&str> = view.columns.iter().map(|c| c.name).collect();
    writeln!(writer, "t\t{}", header.join("\t"))?;
    for row in view.rows() {
        let cells: Vec<String> = view
            .columns
            .iter()
            .map(|c| format!("{:.*}", c.precision, c.value(row)))
            .collect();
        writeln!(writer, "{}\t{}", row.t, cells.join("\t"))?;
    }
    writer.flush()?;
    Ok(())
}

/// One CSV record per step; a failed solve writes only the header.
pub fn write_csv<W: Write>(out: W, view: &ReportView<'_>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    let mut header = vec!["t"];
    header.extend(view.columns.iter().map(|c| c.name));
    writer.write_record(&header)?;
    for row in view.rows() {
        let mut record = vec![row.t.to_string()];
        record.extend(view.columns.iter().map(|c| c.value(row).to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// `{ "summary": .., "violations": [..], "rows": [{ "t": .., <col>: .. }] }`
pub fn write_json<W: Write>(mut out: W, view: &ReportView<'_>) -> Result<()> {
    let rows: Vec<Value> = view
        .rows()
        .map(|row| {
            let mut obj = Map::new();
            obj.insert("t".into(), json!(row.t));
            for c in view.columns {
                obj.insert(c.name.into(), json!(c.value(row)));
            }
            Value::Object(obj)
        })
        .collect();
    let doc = json!({
        "summary": view.report.summary,
        "violations": view.violations,
        "rows": rows,
    });
    serde_json::to_writer_pretty(&mut out, &doc)
        .map_err(|err| anyhow::anyhow!("serializing report to JSON: {err}"))?;
    writeln!(out)?;
    Ok(())
}

/// Write the `t,X_in,x,X0` series to `path`.
pub fn write_plot_series(path: &Path, report: &Report) -> Result<usize> {
    let file =
        File::create(path).with_context(|| format!("creating plot file {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    let mut count = 0;
    for point in report.plot_series() {
        writer.serialize(point)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Print an input series.
pub fn write_series<W: Write>(mut out: W, series: &InputSeries, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let mut writer = TabWriter::new(out);
            writeln!(writer, "t\tX_in")?;
            for (t, v) in series.iter() {
                writeln!(writer, "{t}\t{v:.3}")?;
            }
            writer.flush()?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["t", "X_in"])?;
            for (t, v) in series.iter() {
                writer.write_record([t.to_string(), v.to_string()])?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, series)
                .map_err(|err| anyhow::anyhow!("serializing series to JSON: {err}"))?;
            writeln!(out)?;
        }
    }
    Ok(())
}
