//! Dataset processing: load → resample → rename, once per catalog entry.
//!
//! Each entry produces its own `Result`; a failing series is recorded and
//! skipped so one bad file never aborts the run. Entries share no state, so
//! they can run on the rayon pool. Results are always collected in catalog
//! order, which keeps the output identical with or without parallelism.

use std::path::Path;

use rayon::prelude::*;

use crate::domain::{MissingAction, MissingStage, MissingValueEvent, ProcessedSeries, SeriesConfig};
use crate::error::PipelineError;
use crate::io::ingest::{LoadOptions, load_series};
use crate::observe::PipelineObserver;
use crate::report::MissingValueReport;
use crate::resample::resample_to_month_end;

/// A catalog entry that could not be processed.
#[derive(Debug)]
pub struct SeriesFailure {
    pub file: String,
    pub column: String,
    pub error: PipelineError,
}

impl SeriesFailure {
    fn new(config: &SeriesConfig, error: PipelineError) -> Self {
        Self {
            file: config.file.clone(),
            column: config.column.clone(),
            error,
        }
    }
}

/// A successfully processed entry plus the events it raised.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesResult {
    pub series: ProcessedSeries,
    pub events: Vec<MissingValueEvent>,
}

/// Everything the processor hands to the range aligner.
#[derive(Debug, Default)]
pub struct ProcessingOutcome {
    /// Successfully processed series, in catalog order.
    pub processed: Vec<ProcessedSeries>,
    pub failures: Vec<SeriesFailure>,
    pub report: MissingValueReport,
}

impl ProcessingOutcome {
    pub fn get(&self, column: &str) -> Option<&ProcessedSeries> {
        self.processed.iter().find(|s| s.column == column)
    }
}

/// Process every catalog entry found under `raw_dir`.
pub fn process_all(
    raw_dir: &Path,
    catalog: &[SeriesConfig],
    parallel: bool,
    observer: &dyn PipelineObserver,
) -> ProcessingOutcome {
    let run = |config: &SeriesConfig| process_series(raw_dir, config, observer);

    let results: Vec<Result<SeriesResult, SeriesFailure>> = if parallel {
        catalog.par_iter().map(run).collect()
    } else {
        catalog.iter().map(run).collect()
    };

    let mut outcome = ProcessingOutcome::default();
    for result in results {
        match result {
            Ok(SeriesResult { series, events }) => {
                outcome.report.extend(events);
                outcome.processed.push(series);
            }
            Err(failure) => outcome.failures.push(failure),
        }
    }
    outcome
}

/// Process one catalog entry.
///
/// Failures are reported to the observer before being returned.
pub fn process_series(
    raw_dir: &Path,
    config: &SeriesConfig,
    observer: &dyn PipelineObserver,
) -> Result<SeriesResult, SeriesFailure> {
    let result = try_process_series(raw_dir, config, observer).map_err(|e| SeriesFailure::new(config, e));
    if let Err(failure) = &result {
        observer.series_skipped(failure);
    }
    result
}

fn try_process_series(
    raw_dir: &Path,
    config: &SeriesConfig,
    observer: &dyn PipelineObserver,
) -> Result<SeriesResult, PipelineError> {
    let policy = config.resolve_policy()?;

    let raw = load_series(&raw_dir.join(&config.file), &LoadOptions::default())?;
    observer.series_loaded(config, &raw);

    let mut events = Vec::new();
    if raw.rows_dropped > 0 {
        events.push(MissingValueEvent::new(
            &config.file,
            MissingStage::Raw,
            raw.rows_dropped,
            MissingAction::Dropped,
        ));
    }

    let monthly = resample_to_month_end(&raw.observations, policy);
    if monthly.is_empty() {
        return Err(PipelineError::EmptySeries(config.file.clone()));
    }

    let series = ProcessedSeries {
        source: config.file.clone(),
        column: config.column.clone(),
        policy,
        frequency: raw.frequency,
        index: monthly.index,
        values: monthly.values,
    };

    let missing_after = series.missing_count();
    if missing_after > 0 {
        events.push(MissingValueEvent::new(
            &config.file,
            MissingStage::AfterResample,
            missing_after,
            MissingAction::WillFill,
        ));
    }

    for event in &events {
        observer.missing_values(event);
    }
    observer.series_processed(&series);

    Ok(SeriesResult { series, events })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use crate::domain::ResamplePolicy;
    use crate::observe::SilentObserver;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[derive(Default)]
    struct RecordingObserver {
        skipped: Mutex<Vec<String>>,
        events: Mutex<Vec<MissingValueEvent>>,
    }

    impl PipelineObserver for RecordingObserver {
        fn series_skipped(&self, failure: &SeriesFailure) {
            self.skipped.lock().unwrap().push(failure.column.clone());
        }

        fn missing_values(&self, event: &MissingValueEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, Vec<SeriesConfig>) {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "m1.csv", "date,M1SL\n2001-01-01,1000\n2001-02-01,.\n2001-03-01,1010\n");
        write(
            dir.path(),
            "vix.csv",
            "date,VIXCLS\n2001-01-02,20\n2001-01-03,30\n2001-03-01,10\n",
        );
        write(dir.path(), "broken.csv", "date,v\nnot-a-date,1\n");
        let catalog = vec![
            SeriesConfig::new("m1.csv", "m1_billions", ""),
            SeriesConfig::new("broken.csv", "broken", "last"),
            SeriesConfig::new("vix.csv", "vix_index", "mean"),
            SeriesConfig::new("m1.csv", "bad_policy", "median"),
            SeriesConfig::new("absent.csv", "absent", "last"),
        ];
        (dir, catalog)
    }

    #[test]
    fn failing_series_are_skipped_and_the_rest_processed() {
        let (dir, catalog) = fixture();
        let observer = RecordingObserver::default();
        let outcome = process_all(dir.path(), &catalog, false, &observer);

        let columns: Vec<&str> = outcome.processed.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(columns, vec!["m1_billions", "vix_index"]);

        let failed: Vec<&str> = outcome.failures.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(failed, vec!["broken", "bad_policy", "absent"]);
        assert!(matches!(outcome.failures[0].error, PipelineError::Parse { .. }));
        assert!(matches!(outcome.failures[1].error, PipelineError::UnknownPolicy(_)));
        assert!(matches!(outcome.failures[2].error, PipelineError::Io { .. }));

        assert_eq!(observer.skipped.lock().unwrap().len(), 3);
    }

    #[test]
    fn records_raw_and_after_resample_events() {
        let (dir, catalog) = fixture();
        let outcome = process_all(dir.path(), &catalog, false, &SilentObserver);

        let m1 = outcome.get("m1_billions").unwrap();
        // Raw dates are month starts, so `none` falls back to `last`; February was dropped.
        assert_eq!(m1.policy, ResamplePolicy::None);
        assert_eq!(m1.index, vec![d(2001, 1, 31), d(2001, 2, 28), d(2001, 3, 31)]);
        assert_eq!(m1.values, vec![Some(1000.0), None, Some(1010.0)]);

        let vix = outcome.get("vix_index").unwrap();
        assert_eq!(vix.values, vec![Some(25.0), None, Some(10.0)]);

        assert_eq!(
            outcome.report.events(),
            &[
                MissingValueEvent::new("m1.csv", MissingStage::Raw, 1, MissingAction::Dropped),
                MissingValueEvent::new("m1.csv", MissingStage::AfterResample, 1, MissingAction::WillFill),
                MissingValueEvent::new("vix.csv", MissingStage::AfterResample, 1, MissingAction::WillFill),
            ]
        );
    }

    #[test]
    fn month_end_file_with_a_gap_is_densified_and_flagged() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "hpi.csv", "date,CSUSHPINSA
2001-01-31,1
2001-02-28,.
2001-03-31,3
");
        let catalog = vec![SeriesConfig::new("hpi.csv", "home_price_index", "")];
        let outcome = process_all(dir.path(), &catalog, false, &SilentObserver);

        let hpi = outcome.get("home_price_index").unwrap();
        assert_eq!(hpi.index, vec![d(2001, 1, 31), d(2001, 2, 28), d(2001, 3, 31)]);
        assert_eq!(hpi.values, vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(
            outcome.report.events(),
            &[
                MissingValueEvent::new("hpi.csv", MissingStage::Raw, 1, MissingAction::Dropped),
                MissingValueEvent::new("hpi.csv", MissingStage::AfterResample, 1, MissingAction::WillFill),
            ]
        );
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let (dir, catalog) = fixture();
        let sequential = process_all(dir.path(), &catalog, false, &SilentObserver);
        let parallel = process_all(dir.path(), &catalog, true, &SilentObserver);

        assert_eq!(sequential.processed, parallel.processed);
        assert_eq!(sequential.report, parallel.report);
        let seq_failed: Vec<&str> = sequential.failures.iter().map(|f| f.column.as_str()).collect();
        let par_failed: Vec<&str> = parallel.failures.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(seq_failed, par_failed);
    }

    #[test]
    fn resampled_indices_are_strict_month_ends() {
        let (dir, catalog) = fixture();
        let outcome = process_all(dir.path(), &catalog, false, &SilentObserver);
        for series in &outcome.processed {
            assert!(series.index.iter().all(|d| crate::resample::is_month_end(*d)));
            assert!(series.index.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
