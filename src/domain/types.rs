//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - passed between pipeline stages without hidden shared state
//! - exported to CSV/JSON
//! - constructed directly in tests

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Native sampling frequency of a raw series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Monthly,
    Quarterly,
    /// Spacing did not match any supported frequency (or too few points).
    Irregular,
}

impl Frequency {
    pub fn label(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Irregular => "irregular",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Frequency hint passed to the loader.
///
/// `Infer` means: derive the frequency from the spacing of the dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyHint {
    #[default]
    Infer,
    Known(Frequency),
}

impl FromStr for FrequencyHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "infer" => Ok(FrequencyHint::Infer),
            "d" | "b" | "daily" => Ok(FrequencyHint::Known(Frequency::Daily)),
            "m" | "me" | "ms" | "monthly" => Ok(FrequencyHint::Known(Frequency::Monthly)),
            "q" | "qe" | "qs" | "quarterly" => Ok(FrequencyHint::Known(Frequency::Quarterly)),
            other => Err(format!(
                "unsupported frequency '{other}' (expected one of: infer, D, M, Q)"
            )),
        }
    }
}

/// How a series is brought onto month-end frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResamplePolicy {
    /// Already monthly. Falls back to `Last` unless dates are consecutive month-ends.
    None,
    /// Last observation within the calendar month.
    Last,
    /// Arithmetic mean of the month's observations.
    Mean,
    /// Sum of the month's observations.
    Sum,
    /// Carry the last known value into every month until superseded.
    #[serde(rename = "ffill")]
    ForwardFill,
}

impl ResamplePolicy {
    pub fn label(self) -> &'static str {
        match self {
            ResamplePolicy::None => "none",
            ResamplePolicy::Last => "last",
            ResamplePolicy::Mean => "mean",
            ResamplePolicy::Sum => "sum",
            ResamplePolicy::ForwardFill => "ffill",
        }
    }
}

impl fmt::Display for ResamplePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResamplePolicy {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(ResamplePolicy::None),
            "last" => Ok(ResamplePolicy::Last),
            "mean" => Ok(ResamplePolicy::Mean),
            "sum" => Ok(ResamplePolicy::Sum),
            "ffill" | "forward-fill" | "forward_fill" => Ok(ResamplePolicy::ForwardFill),
            _ => Err(PipelineError::UnknownPolicy(s.to_string())),
        }
    }
}

/// One catalog entry: where a series comes from, what it is called in the
/// panel, and how it is resampled.
///
/// The policy stays a string until the series is processed, so a bad policy
/// only takes out its own series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub file: String,
    pub column: String,
    #[serde(default)]
    pub policy: String,
}

impl SeriesConfig {
    pub fn new(file: impl Into<String>, column: impl Into<String>, policy: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            column: column.into(),
            policy: policy.into(),
        }
    }

    pub fn resolve_policy(&self) -> Result<ResamplePolicy, PipelineError> {
        self.policy.parse()
    }
}

/// A cleaned raw series: sorted, de-duplicated, no absent values.
#[derive(Debug, Clone)]
pub struct RawSeries {
    /// Source file name (used as the dataset label in reports).
    pub source: String,
    /// Resolved name of the value column in the source file.
    pub value_column: String,
    pub frequency: Frequency,
    pub observations: Vec<(NaiveDate, f64)>,
    pub rows_read: usize,
    /// Rows dropped for a missing date or value.
    pub rows_dropped: usize,
    /// Rows dropped because a later row carried the same date.
    pub duplicates_dropped: usize,
}

impl RawSeries {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|(d, _)| *d)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|(d, _)| *d)
    }
}

/// A series resampled onto month-end dates and renamed to its panel column.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSeries {
    pub source: String,
    pub column: String,
    pub policy: ResamplePolicy,
    pub frequency: Frequency,
    /// Strictly increasing month-end dates.
    pub index: Vec<NaiveDate>,
    /// Same length as `index`; `None` for months without observations.
    pub values: Vec<Option<f64>>,
}

impl ProcessedSeries {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.index.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.index.last().copied()
    }

    /// First month-end carrying a value.
    pub fn first_observed(&self) -> Option<NaiveDate> {
        self.index
            .iter()
            .zip(&self.values)
            .find(|(_, v)| v.is_some())
            .map(|(d, _)| *d)
    }

    /// Last month-end carrying a value.
    pub fn last_observed(&self) -> Option<NaiveDate> {
        self.index
            .iter()
            .zip(&self.values)
            .rev()
            .find(|(_, v)| v.is_some())
            .map(|(d, _)| *d)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// The month-end index shared by every column of the merged panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonDateIndex {
    /// Column whose first date set the lower bound.
    pub anchor: String,
    /// Column whose last date set the upper bound.
    pub bounded_by: String,
    pub dates: Vec<NaiveDate>,
}

impl CommonDateIndex {
    pub fn start(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// A processed series reindexed onto the common index, with fills applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub column: String,
    pub index: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
    /// First month-end the series actually covers (`None` if it has no values).
    pub first_observed: Option<NaiveDate>,
    pub inception_gap: bool,
    pub forward_filled: usize,
    pub backward_filled: usize,
}

impl AlignedSeries {
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// Pipeline stage at which a missing-value event was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStage {
    Raw,
    AfterResample,
    Final,
}

impl MissingStage {
    pub fn label(self) -> &'static str {
        match self {
            MissingStage::Raw => "raw",
            MissingStage::AfterResample => "after_resample",
            MissingStage::Final => "final",
        }
    }
}

/// What the pipeline did about the missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingAction {
    #[serde(rename = "dropped")]
    Dropped,
    #[serde(rename = "will_fill")]
    WillFill,
    /// Values remain absent after forward and backward fill.
    #[serde(rename = "STILL_MISSING")]
    StillMissing,
}

impl MissingAction {
    pub fn label(self) -> &'static str {
        match self {
            MissingAction::Dropped => "dropped",
            MissingAction::WillFill => "will_fill",
            MissingAction::StillMissing => "STILL_MISSING",
        }
    }
}

/// One row of the missing-value audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingValueEvent {
    pub dataset: String,
    pub stage: MissingStage,
    pub missing_count: usize,
    pub action: MissingAction,
}

impl MissingValueEvent {
    pub fn new(dataset: impl Into<String>, stage: MissingStage, missing_count: usize, action: MissingAction) -> Self {
        Self {
            dataset: dataset.into(),
            stage,
            missing_count,
            action,
        }
    }
}

/// A single column of the merged panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// The final rectangular monthly panel.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPanel {
    pub index: Vec<NaiveDate>,
    pub columns: Vec<PanelColumn>,
}

impl MergedPanel {
    pub fn rows(&self) -> usize {
        self.index.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&PanelColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Rule that picks the series anchoring the start of the common range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorRule {
    /// A fixed column (the gold-price series by default).
    Column(String),
    /// The series with the latest first observation, ignoring inception-gap
    /// series. Ties go to the earlier catalog entry.
    LatestStart,
}

impl Default for AnchorRule {
    fn default() -> Self {
        AnchorRule::Column(crate::domain::DEFAULT_ANCHOR_COLUMN.to_string())
    }
}

impl FromStr for AnchorRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "" => Err("anchor must not be empty".to_string()),
            "latest-start" | "latest_start" => Ok(AnchorRule::LatestStart),
            _ => Ok(AnchorRule::Column(s.to_string())),
        }
    }
}

impl fmt::Display for AnchorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorRule::Column(name) => f.write_str(name),
            AnchorRule::LatestStart => f.write_str("latest-start"),
        }
    }
}

/// Role assignments used by the range aligner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRules {
    pub anchor: AnchorRule,
    /// Columns allowed to stay absent before their own first observation.
    pub inception_gap: Vec<String>,
}

impl AlignmentRules {
    pub fn is_inception_gap(&self, column: &str) -> bool {
        self.inception_gap.iter().any(|c| c == column)
    }
}

impl Default for AlignmentRules {
    fn default() -> Self {
        Self {
            anchor: AnchorRule::default(),
            inception_gap: vec![crate::domain::DEFAULT_INCEPTION_GAP_COLUMN.to_string()],
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags and environment (plus defaults).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub final_dir: PathBuf,
    pub catalog: Vec<SeriesConfig>,
    pub alignment: AlignmentRules,
    /// Process series concurrently (same output either way).
    pub parallel: bool,
    /// Write one CSV per aligned series into `processed_dir`.
    pub write_processed: bool,
    pub summary_json: Option<PathBuf>,
}
