//! Write per-series files, the merged panel and the missing-value report.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts: a `date` column first, ISO dates, empty cells for absent values.
//! Nothing time-dependent is written, so identical inputs give identical bytes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::{AlignedSeries, MERGED_FILE_NAME, MergedPanel, REPORT_FILE_NAME};
use crate::error::PipelineError;
use crate::report::MissingValueReport;

/// Paths written by `write_outputs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenFiles {
    pub series: Vec<PathBuf>,
    pub panel: PathBuf,
    pub report: PathBuf,
}

/// Write every artifact of a run.
///
/// Per-series files are skipped when `processed_dir` is `None`.
pub fn write_outputs(
    processed_dir: Option<&Path>,
    final_dir: &Path,
    aligned: &[AlignedSeries],
    panel: &MergedPanel,
    report: &MissingValueReport,
) -> Result<WrittenFiles, PipelineError> {
    let mut written = WrittenFiles::default();

    if let Some(dir) = processed_dir {
        ensure_dir(dir)?;
        for series in aligned {
            let path = dir.join(format!("{}.csv", series.column));
            write_series_csv(&path, series)?;
            written.series.push(path);
        }
    }

    ensure_dir(final_dir)?;
    written.panel = final_dir.join(MERGED_FILE_NAME);
    write_panel_csv(&written.panel, panel)?;

    written.report = final_dir.join(REPORT_FILE_NAME);
    write_report_csv(&written.report, report)?;

    Ok(written)
}

/// One aligned series as `date,<column>`.
pub fn write_series_csv(path: &Path, series: &AlignedSeries) -> Result<(), PipelineError> {
    let file = create(path)?;
    write_columns(file, &series.index, &[(&series.column, &series.values)]).map_err(|e| csv_error(path, e))
}

/// The merged panel as `date,<col1>,<col2>,...`.
pub fn write_panel_csv(path: &Path, panel: &MergedPanel) -> Result<(), PipelineError> {
    let file = create(path)?;
    write_panel(file, panel).map_err(|e| csv_error(path, e))
}

/// Write the merged panel to any writer.
pub fn write_panel<W: Write>(out: W, panel: &MergedPanel) -> Result<(), csv::Error> {
    let columns: Vec<(&str, &[Option<f64>])> = panel
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.values.as_slice()))
        .collect();
    write_columns(out, &panel.index, &columns)
}

/// The audit trail as `dataset,stage,missing_count,action`.
///
/// Always written; a run without events produces a header-only file.
pub fn write_report_csv(path: &Path, report: &MissingValueReport) -> Result<(), PipelineError> {
    let file = create(path)?;
    write_report(file, report).map_err(|e| csv_error(path, e))
}

pub fn write_report<W: Write>(out: W, report: &MissingValueReport) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["dataset", "stage", "missing_count", "action"])?;
    for event in report.events() {
        let count = event.missing_count.to_string();
        writer.write_record([
            event.dataset.as_str(),
            event.stage.label(),
            count.as_str(),
            event.action.label(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_columns<W: Write, S: AsRef<str>, V: AsRef<[Option<f64>]>>(
    out: W,
    dates: &[NaiveDate],
    columns: &[(S, V)],
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = Vec::with_capacity(columns.len() + 1);
    header.push("date".to_string());
    header.extend(columns.iter().map(|(name, _)| name.as_ref().to_string()));
    writer.write_record(&header)?;

    for (row, date) in dates.iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(date.format("%Y-%m-%d").to_string());
        for (_, values) in columns {
            record.push(format_value(values.as_ref().get(row).copied().flatten()));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn ensure_dir(dir: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))
}

fn create(path: &Path) -> Result<File, PipelineError> {
    File::create(path).map_err(|e| PipelineError::io(path, e))
}

fn csv_error(path: &Path, err: csv::Error) -> PipelineError {
    PipelineError::io(path, std::io::Error::other(err))
}
