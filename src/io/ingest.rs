//! Raw series ingest and cleaning.
//!
//! This module is responsible for turning one provider CSV into a clean,
//! sorted `(date, value)` series that is safe to resample.
//!
//! Design goals:
//! - **Strict dates**: a malformed date fails the whole file (`ParseError`)
//! - **Counted drops**: rows with a missing date or value are dropped, never
//!   silently; the count travels with the series
//! - **Deterministic behavior**: stable sort, last duplicate wins
//! - **Separation of concerns**: no resampling logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::debug;

use crate::domain::{FrequencyHint, RawSeries};
use crate::error::PipelineError;
use crate::resample::infer_frequency;

/// Column/frequency overrides for a single load.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Defaults to `date` if present, else the first column.
    pub date_column: Option<String>,
    /// Defaults to the first non-date column.
    pub value_column: Option<String>,
    pub frequency: FrequencyHint,
}

/// Cell contents treated as "no value" (FRED uses `.`).
const MISSING_TOKENS: [&str; 7] = [".", "na", "n/a", "nan", "null", "none", "#n/a"];

/// Load and clean one raw series from a CSV file.
pub fn load_series(path: &Path, options: &LoadOptions) -> Result<RawSeries, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    load_series_from_reader(&source, file, options)
}

/// Load and clean one raw series from any CSV reader.
///
/// `source` labels the series in errors and reports.
pub fn load_series_from_reader<R: Read>(
    source: &str,
    input: R,
    options: &LoadOptions,
) -> Result<RawSeries, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::parse(source, format!("failed to read CSV headers: {e}")))?
        .clone();

    let columns = resolve_columns(source, &headers, options)?;

    let mut rows: Vec<(NaiveDate, f64)> = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = result.map_err(|e| PipelineError::parse(source, format!("line {line}: {e}")))?;

        let date = parse_date_cell(record.get(columns.date_idx))
            .map_err(|m| PipelineError::parse(source, format!("line {line}: {m}")))?;
        let value = parse_value_cell(record.get(columns.value_idx))
            .map_err(|m| PipelineError::parse(source, format!("line {line}: {m}")))?;

        match (date, value) {
            (Some(d), Some(v)) => rows.push((d, v)),
            _ => rows_dropped += 1,
        }
    }

    // Stable sort keeps file order among equal dates, so the last row wins below.
    rows.sort_by_key(|(d, _)| *d);
    let kept_before_dedup = rows.len();
    let observations = dedup_keep_last(rows);
    let duplicates_dropped = kept_before_dedup - observations.len();

    let (Some(first), Some(last)) = (observations.first(), observations.last()) else {
        return Err(PipelineError::EmptySeries(source.to_string()));
    };

    let frequency = match options.frequency {
        FrequencyHint::Known(freq) => freq,
        FrequencyHint::Infer => {
            let dates: Vec<NaiveDate> = observations.iter().map(|(d, _)| *d).collect();
            infer_frequency(&dates)
        }
    };

    debug!(
        source,
        column = %columns.value_name,
        rows = observations.len(),
        from = %first.0,
        to = %last.0,
        frequency = %frequency,
        "loaded raw series"
    );

    Ok(RawSeries {
        source: source.to_string(),
        value_column: columns.value_name,
        frequency,
        observations,
        rows_read,
        rows_dropped,
        duplicates_dropped,
    })
}

/// Column positions chosen for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedColumns {
    date_idx: usize,
    value_idx: usize,
    value_name: String,
}

fn resolve_columns(
    source: &str,
    headers: &StringRecord,
    options: &LoadOptions,
) -> Result<ResolvedColumns, PipelineError> {
    if headers.is_empty() {
        return Err(PipelineError::parse(source, "file has no header row"));
    }

    let header_map = build_header_map(headers);

    let date_idx = match &options.date_column {
        Some(name) => *header_map
            .get(&normalize_header_name(name))
            .ok_or_else(|| PipelineError::parse(source, format!("missing date column `{name}`")))?,
        None => header_map.get("date").copied().unwrap_or(0),
    };

    let value_idx = match &options.value_column {
        Some(name) => {
            let idx = *header_map
                .get(&normalize_header_name(name))
                .ok_or_else(|| PipelineError::parse(source, format!("missing value column `{name}`")))?;
            if idx == date_idx {
                return Err(PipelineError::parse(
                    source,
                    format!("value column `{name}` is the date column"),
                ));
            }
            idx
        }
        None => (0..headers.len())
            .find(|idx| *idx != date_idx)
            .ok_or_else(|| PipelineError::parse(source, "no value column next to the date column"))?,
    };

    let value_name = headers
        .get(value_idx)
        .map(clean_header_name)
        .unwrap_or_default();

    Ok(ResolvedColumns {
        date_idx,
        value_idx,
        value_name,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn clean_header_name(name: &str) -> String {
    // Excel and some download scripts emit UTF-8 CSVs with a BOM prefix on the
    // first header; it must not leak into column names.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn normalize_header_name(name: &str) -> String {
    clean_header_name(name).to_ascii_lowercase()
}

fn is_missing_token(s: &str) -> bool {
    s.is_empty() || MISSING_TOKENS.iter().any(|t| s.eq_ignore_ascii_case(t))
}

/// `Ok(None)` for an empty cell, `Err` for text that is not a date.
fn parse_date_cell(raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    let s = raw.map(str::trim).unwrap_or_default();
    if s.is_empty() {
        return Ok(None);
    }
    parse_date(s).map(Some)
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // Providers disagree: FRED writes ISO dates, Yahoo exports often carry a
    // time and a UTC offset. The calendar date as written is what we keep.
    const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    const OFFSET_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%dT%H:%M:%S%:z"];

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    for fmt in OFFSET_FMTS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.date_naive());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(format!(
        "invalid date '{s}'. Expected YYYY-MM-DD (optionally with a time and offset)."
    ))
}

/// `Ok(None)` for empty/missing markers and non-finite numbers.
fn parse_value_cell(raw: Option<&str>) -> Result<Option<f64>, String> {
    let s = raw.map(str::trim).unwrap_or_default();
    if is_missing_token(s) {
        return Ok(None);
    }
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("invalid numeric value '{s}'"))?;
    if v.is_finite() { Ok(Some(v)) } else { Ok(None) }
}

fn dedup_keep_last(sorted: Vec<(NaiveDate, f64)>) -> Vec<(NaiveDate, f64)> {
    let mut out: Vec<(NaiveDate, f64)> = Vec::with_capacity(sorted.len());
    for (date, value) in sorted {
        match out.last_mut() {
            Some(prev) if prev.0 == date => prev.1 = value,
            _ => out.push((date, value)),
        }
    }
    out
}
