use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level error returned to `main`, carrying the process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors raised by the cleaning / resampling / alignment pipeline.
///
/// `Parse`, `UnknownPolicy`, `EmptySeries` and most `Io` errors are per-series:
/// the dataset processor records them and skips the series. `MissingAnchor`,
/// `EmptyDateRange` and `Alignment` abort the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed date or value, or a file without a usable column.
    #[error("parse error in '{source_name}': {message}")]
    Parse { source_name: String, message: String },

    #[error("unknown resampling policy: '{0}'")]
    UnknownPolicy(String),

    /// The series that anchors the common date range is absent or empty.
    #[error("anchor series unavailable: {0}")]
    MissingAnchor(String),

    #[error("empty common date range: start {start} is after end {end}")]
    EmptyDateRange { start: NaiveDate, end: NaiveDate },

    /// An aligned column does not share the common date index.
    #[error("alignment error for '{column}': {message}")]
    Alignment { column: String, message: String },

    #[error("no observations left in '{0}' after cleaning")]
    EmptySeries(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code used when this error aborts the run.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Parse { .. }
            | PipelineError::UnknownPolicy(_)
            | PipelineError::EmptySeries(_)
            | PipelineError::Io { .. } => 2,
            PipelineError::MissingAnchor(_) | PipelineError::EmptyDateRange { .. } => 3,
            PipelineError::Alignment { .. } => 4,
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_map_to_distinct_exit_codes() {
        let anchor: AppError = PipelineError::MissingAnchor("gold_price_usd".to_string()).into();
        assert_eq!(anchor.exit_code(), 3);
        assert!(anchor.to_string().contains("gold_price_usd"));

        let align: AppError = PipelineError::Alignment {
            column: "vix_index".to_string(),
            message: "length mismatch".to_string(),
        }
        .into();
        assert_eq!(align.exit_code(), 4);

        let policy: AppError = PipelineError::UnknownPolicy("median".to_string()).into();
        assert_eq!(policy.exit_code(), 2);
        assert_eq!(policy.to_string(), "unknown resampling policy: 'median'");
    }

    #[test]
    fn empty_series_is_an_input_error() {
        let empty: AppError = PipelineError::EmptySeries("vix.csv".to_string()).into();
        assert_eq!(empty.exit_code(), 2);

        let range: AppError = PipelineError::EmptyDateRange {
            start: NaiveDate::from_ymd_opt(2010, 1, 31).unwrap(),
            end: NaiveDate::from_ymd_opt(2005, 1, 31).unwrap(),
        }
        .into();
        assert_eq!(range.exit_code(), 3);
    }
}
