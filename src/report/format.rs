//! Formatted terminal output.

use crate::domain::{RawSeries, SeriesConfig};
use crate::report::RunSummary;

/// Format the end-of-run summary (panel shape, range, gaps, skipped series).
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== panel - monthly macro panel ===\n");
    out.push_str(&format!(
        "Shape: {} rows x {} columns\n",
        summary.rows,
        summary.columns.len()
    ));
    match (summary.start, summary.end) {
        (Some(start), Some(end)) => {
            out.push_str(&format!("Range: {start} to {end} ({:.1} years)\n", summary.years_of_data));
        }
        _ => out.push_str("Range: (empty)\n"),
    }
    out.push_str(&format!(
        "Anchor: {} | bounded by: {}\n",
        summary.anchor, summary.bounded_by
    ));

    out.push_str(&format!("\nMissing values by column (total {}):\n", summary.total_missing));
    out.push_str(&format!("{:<24} {:>8} {:>8}", "column", "missing", "pct"));
    out.push('\n');
    out.push_str(&format!("{:-<24} {:-<8} {:-<8}", "", "", ""));
    out.push('\n');
    for col in &summary.missing_by_column {
        out.push_str(&format!(
            "{:<24} {:>8} {:>7.1}%\n",
            truncate(&col.column, 24),
            col.missing,
            col.pct
        ));
    }

    if !summary.inception.is_empty() {
        out.push_str("\nLate-starting series:\n");
        for cov in &summary.inception {
            let from = cov
                .available_from
                .map(|d| d.to_string())
                .unwrap_or_else(|| "never".to_string());
            out.push_str(&format!(
                "- {}: available from {from} ({} months observed, {} months before inception)\n",
                cov.column, cov.observed_months, cov.absent_months
            ));
        }
    }

    let still_missing: Vec<_> = summary.still_missing().collect();
    if !still_missing.is_empty() {
        out.push_str("\nStill missing after fill:\n");
        for event in still_missing {
            out.push_str(&format!("- {}: {} values\n", event.dataset, event.missing_count));
        }
    }

    if !summary.skipped.is_empty() {
        out.push_str(&format!("\nSkipped series ({}):\n", summary.skipped.len()));
        for s in &summary.skipped {
            out.push_str(&format!("- {} ({}): {}\n", s.file, s.column, s.reason));
        }
    }

    out
}

/// Format the series catalog as a table.
pub fn format_catalog(entries: &[SeriesConfig]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<28} {:<24} {:<8}", "file", "column", "policy").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<28} {:-<24} {:-<8}", "", "", "").trim_end());
    out.push('\n');
    for entry in entries {
        let policy = if entry.policy.trim().is_empty() {
            "none"
        } else {
            entry.policy.as_str()
        };
        out.push_str(
            format!(
                "{:<28} {:<24} {:<8}",
                truncate(&entry.file, 28),
                truncate(&entry.column, 24),
                policy
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Format what the loader made of a single raw file.
pub fn format_inspection(raw: &RawSeries) -> String {
    let mut out = String::new();
    out.push_str(&format!("File: {}\n", raw.source));
    out.push_str(&format!("Value column: {}\n", raw.value_column));
    out.push_str(&format!("Frequency: {}\n", raw.frequency));
    match (raw.first_date(), raw.last_date()) {
        (Some(first), Some(last)) => out.push_str(&format!("Range: {first} to {last}\n")),
        _ => out.push_str("Range: (empty)\n"),
    }
    out.push_str(&format!(
        "Rows: read={} kept={} missing={} duplicate_dates={}\n",
        raw.rows_read,
        raw.len(),
        raw.rows_dropped,
        raw.duplicates_dropped
    ));
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use crate::domain::{Frequency, MissingAction, MissingStage, MissingValueEvent};
    use crate::report::{ColumnMissing, InceptionCoverage, SkippedSeries};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn summary() -> RunSummary {
        RunSummary {
            tool: "panel".to_string(),
            start: Some(d(2001, 2, 28)),
            end: Some(d(2001, 3, 31)),
            anchor: "gold_price_usd".to_string(),
            bounded_by: "m2_billions".to_string(),
            rows: 2,
            columns: vec!["gold_price_usd".to_string(), "bitcoin_price_usd".to_string()],
            years_of_data: 0.09,
            total_missing: 2,
            missing_by_column: vec![
                ColumnMissing {
                    column: "gold_price_usd".to_string(),
                    missing: 0,
                    total: 2,
                    pct: 0.0,
                },
                ColumnMissing {
                    column: "bitcoin_price_usd".to_string(),
                    missing: 2,
                    total: 2,
                    pct: 100.0,
                },
            ],
            inception: vec![InceptionCoverage {
                column: "bitcoin_price_usd".to_string(),
                available_from: None,
                observed_months: 0,
                absent_months: 2,
            }],
            skipped: vec![SkippedSeries {
                file: "vix.csv".to_string(),
                column: "vix_index".to_string(),
                reason: "unknown resample policy `median`".to_string(),
            }],
            events: vec![MissingValueEvent::new(
                "cpi_median",
                MissingStage::Final,
                4,
                MissingAction::StillMissing,
            )],
        }
    }

    #[test]
    fn run_summary_lists_every_section() {
        let text = format_run_summary(&summary());
        assert!(text.contains("Shape: 2 rows x 2 columns"));
        assert!(text.contains("Range: 2001-02-28 to 2001-03-31 (0.1 years)"));
        assert!(text.contains("bitcoin_price_usd               2   100.0%"));
        assert!(text.contains("- bitcoin_price_usd: available from never"));
        assert!(text.contains("- cpi_median: 4 values"));
        assert!(text.contains("- vix.csv (vix_index): unknown resample policy `median`"));
    }

    #[test]
    fn catalog_table_shows_none_for_blank_policy() {
        let entries = vec![
            SeriesConfig::new("M1.csv", "m1_billions", ""),
            SeriesConfig::new("vix.csv", "vix_index", "mean"),
        ];
        assert_eq!(
            format_catalog(&entries),
            "file                         column                   policy\n\
             ---------------------------- ------------------------ --------\n\
             M1.csv                       m1_billions              none\n\
             vix.csv                      vix_index                mean\n"
        );
    }

    #[test]
    fn inspection_reports_counts() {
        let raw = RawSeries {
            source: "gdp.csv".to_string(),
            value_column: "GDP".to_string(),
            frequency: Frequency::Quarterly,
            observations: vec![(d(2020, 1, 1), 1.0), (d(2020, 4, 1), 2.0)],
            rows_read: 3,
            rows_dropped: 1,
            duplicates_dropped: 0,
        };
        let text = format_inspection(&raw);
        assert!(text.contains("Frequency: quarterly\n"));
        assert!(text.contains("Range: 2020-01-01 to 2020-04-01\n"));
        assert!(text.contains("Rows: read=3 kept=2 missing=1 duplicate_dates=0\n"));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
