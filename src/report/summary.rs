//! Run summary: one serializable view of what a run produced.

use chrono::NaiveDate;
use serde::Serialize;

use crate::align::Alignment;
use crate::domain::{MergedPanel, MissingAction, MissingValueEvent};
use crate::process::SeriesFailure;
use crate::report::{ColumnMissing, MissingValueReport, column_missing};

/// A series that was dropped from the run, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSeries {
    pub file: String,
    pub column: String,
    pub reason: String,
}

/// Coverage of a series allowed to start late.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InceptionCoverage {
    pub column: String,
    pub available_from: Option<NaiveDate>,
    pub observed_months: usize,
    /// Months before the series existed (left absent on purpose).
    pub absent_months: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub tool: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub anchor: String,
    pub bounded_by: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub years_of_data: f64,
    pub total_missing: usize,
    pub missing_by_column: Vec<ColumnMissing>,
    pub inception: Vec<InceptionCoverage>,
    pub skipped: Vec<SkippedSeries>,
    pub events: Vec<MissingValueEvent>,
}

impl RunSummary {
    pub fn still_missing(&self) -> impl Iterator<Item = &MissingValueEvent> {
        self.events
            .iter()
            .filter(|e| e.action == MissingAction::StillMissing)
    }
}

/// Summarize a finished run.
pub fn build_summary(
    alignment: &Alignment,
    panel: &MergedPanel,
    report: &MissingValueReport,
    failures: &[SeriesFailure],
) -> RunSummary {
    let start = alignment.index.start();
    let end = alignment.index.end();
    let years_of_data = match (start, end) {
        (Some(s), Some(e)) => (e - s).num_days() as f64 / 365.25,
        _ => 0.0,
    };

    let missing_by_column = column_missing(panel);
    let total_missing = missing_by_column.iter().map(|c| c.missing).sum();

    let inception = alignment
        .series
        .iter()
        .filter(|s| s.inception_gap)
        .map(|s| {
            let absent_months = s.missing_count();
            InceptionCoverage {
                column: s.column.clone(),
                available_from: s
                    .index
                    .iter()
                    .zip(&s.values)
                    .find(|(_, v)| v.is_some())
                    .map(|(d, _)| *d),
                observed_months: s.values.len() - absent_months,
                absent_months,
            }
        })
        .collect();

    let skipped = failures
        .iter()
        .map(|f| SkippedSeries {
            file: f.file.clone(),
            column: f.column.clone(),
            reason: f.error.to_string(),
        })
        .collect();

    RunSummary {
        tool: "panel".to_string(),
        start,
        end,
        anchor: alignment.index.anchor.clone(),
        bounded_by: alignment.index.bounded_by.clone(),
        rows: panel.rows(),
        columns: panel.columns.iter().map(|c| c.name.clone()).collect(),
        years_of_data,
        total_missing,
        missing_by_column,
        inception,
        skipped,
        events: report.events().to_vec(),
    }
}
