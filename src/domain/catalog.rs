//! The series catalog: which raw files make up the panel.
//!
//! The built-in table is the production configuration. A CSV with the columns
//! `file,column,policy` can replace it for ad-hoc runs.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use crate::domain::SeriesConfig;
use crate::error::PipelineError;

/// Column that anchors the start of the common date range by default.
pub const DEFAULT_ANCHOR_COLUMN: &str = "gold_price_usd";

/// Column allowed to stay absent before it existed.
pub const DEFAULT_INCEPTION_GAP_COLUMN: &str = "bitcoin_price_usd";

pub const MERGED_FILE_NAME: &str = "merged_economic_data.csv";
pub const REPORT_FILE_NAME: &str = "missing_values_report.csv";

/// `(raw file, panel column, resample policy)`.
///
/// An empty policy means the source is already monthly.
const BUILTIN_CATALOG: [(&str, &str, &str); 17] = [
    // Monetary aggregates (monthly)
    ("M1.csv", "m1_billions", ""),
    ("M2.csv", "m2_billions", ""),
    // Interest rates (daily)
    ("federal_funds_rate.csv", "fed_funds_rate", "last"),
    ("real_interest_rate_10y.csv", "real_rate_10y", "last"),
    ("yield_curve_slope.csv", "yield_curve_slope", "last"),
    ("bbb_spread.csv", "bbb_spread", "last"),
    // Inflation (monthly)
    ("pce.csv", "pce_index", ""),
    ("cpi.csv", "cpi_median", ""),
    // Real economy
    ("gdp.csv", "gdp_billions", "ffill"),
    ("unemployment_rate.csv", "unemployment_rate", ""),
    // Asset prices
    ("home_price_index.csv", "home_price_index", ""),
    ("sp500.csv", "sp500_index", "last"),
    ("gold_price.csv", "gold_price_usd", "last"),
    ("bitcoin_price.csv", "bitcoin_price_usd", "last"),
    // Market indicators
    ("vix.csv", "vix_index", "mean"),
    ("epu_index.csv", "epu_index", "mean"),
    ("consumer_sentiment.csv", "consumer_sentiment", ""),
];

/// The production series catalog, in panel column order.
pub fn builtin_catalog() -> Vec<SeriesConfig> {
    BUILTIN_CATALOG
        .iter()
        .map(|(file, column, policy)| SeriesConfig::new(*file, *column, *policy))
        .collect()
}

/// Load a catalog from a `file,column,policy` CSV.
///
/// Policies are not validated here; an unknown policy fails only its own
/// series when the pipeline runs.
pub fn load_catalog(path: &Path) -> Result<Vec<SeriesConfig>, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let source_name = path.display().to_string();

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let mut entries = Vec::new();
    for (idx, record) in reader.deserialize::<SeriesConfig>().enumerate() {
        let entry = record.map_err(|e| PipelineError::parse(&source_name, format!("line {}: {e}", idx + 2)))?;
        entries.push(entry);
    }

    validate_catalog(&source_name, &entries)?;
    Ok(entries)
}

/// Reject catalogs the processor cannot key unambiguously.
pub fn validate_catalog(source_name: &str, entries: &[SeriesConfig]) -> Result<(), PipelineError> {
    if entries.is_empty() {
        return Err(PipelineError::parse(source_name, "catalog has no entries"));
    }

    let mut seen = HashSet::new();
    for entry in entries {
        if entry.file.trim().is_empty() || entry.column.trim().is_empty() {
            return Err(PipelineError::parse(
                source_name,
                "catalog entries need both `file` and `column`",
            ));
        }
        if !seen.insert(entry.column.as_str()) {
            return Err(PipelineError::parse(
                source_name,
                format!("duplicate output column `{}`", entry.column),
            ));
        }
    }
    Ok(())
}
