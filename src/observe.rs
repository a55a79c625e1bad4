//! Progress reporting hooks for the pipeline.
//!
//! The pipeline never prints. It reports what it does through a
//! `PipelineObserver`; the binary plugs in `TracingObserver`, tests plug in
//! `SilentObserver` or their own recorder.
//!
//! Observers must be `Sync` because series can be processed in parallel.

use tracing::{info, warn};

use crate::domain::{
    AlignedSeries, CommonDateIndex, MissingAction, MissingValueEvent, ProcessedSeries, RawSeries, SeriesConfig,
};
use crate::process::SeriesFailure;

pub trait PipelineObserver: Send + Sync {
    fn series_loaded(&self, _config: &SeriesConfig, _raw: &RawSeries) {}

    fn series_processed(&self, _series: &ProcessedSeries) {}

    fn series_skipped(&self, _failure: &SeriesFailure) {}

    fn missing_values(&self, _event: &MissingValueEvent) {}

    fn range_determined(&self, _index: &CommonDateIndex) {}

    fn series_aligned(&self, _series: &AlignedSeries) {}
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl PipelineObserver for SilentObserver {}

/// Emits one structured `tracing` event per notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn series_loaded(&self, config: &SeriesConfig, raw: &RawSeries) {
        info!(
            file = %config.file,
            rows = raw.len(),
            from = %raw.first_date().map(|d| d.to_string()).unwrap_or_default(),
            to = %raw.last_date().map(|d| d.to_string()).unwrap_or_default(),
            frequency = %raw.frequency,
            "loaded"
        );
        if raw.duplicates_dropped > 0 {
            warn!(file = %config.file, duplicates = raw.duplicates_dropped, "duplicate dates collapsed (last row kept)");
        }
    }

    fn series_processed(&self, series: &ProcessedSeries) {
        info!(
            column = %series.column,
            policy = %series.policy,
            months = series.index.len(),
            "resampled to month-end"
        );
    }

    fn series_skipped(&self, failure: &SeriesFailure) {
        warn!(file = %failure.file, column = %failure.column, error = %failure.error, "series skipped");
    }

    fn missing_values(&self, event: &MissingValueEvent) {
        match event.action {
            MissingAction::StillMissing => warn!(
                dataset = %event.dataset,
                count = event.missing_count,
                "values still missing after forward/backward fill"
            ),
            _ => info!(
                dataset = %event.dataset,
                stage = event.stage.label(),
                count = event.missing_count,
                action = event.action.label(),
                "missing values"
            ),
        }
    }

    fn range_determined(&self, index: &CommonDateIndex) {
        info!(
            anchor = %index.anchor,
            bounded_by = %index.bounded_by,
            start = %index.start().map(|d| d.to_string()).unwrap_or_default(),
            end = %index.end().map(|d| d.to_string()).unwrap_or_default(),
            months = index.len(),
            "common date range"
        );
    }

    fn series_aligned(&self, series: &AlignedSeries) {
        if series.inception_gap {
            info!(
                column = %series.column,
                available_from = %series.first_observed.map(|d| d.to_string()).unwrap_or_default(),
                absent = series.missing_count(),
                "inception-gap series: leading months kept absent"
            );
        } else if series.forward_filled + series.backward_filled > 0 {
            info!(
                column = %series.column,
                forward = series.forward_filled,
                backward = series.backward_filled,
                "gaps filled"
            );
        }
    }
}
