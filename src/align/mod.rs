//! Range alignment: the barrier stage that needs every processed series.
//!
//! Responsibilities:
//!
//! - compute the common month-end index (`range`)
//! - reindex each series onto it and fill gaps by role (`fill`)
//! - flag columns that stay incomplete as `STILL_MISSING`

pub mod fill;
pub mod range;

pub use fill::*;
pub use range::*;

use crate::domain::{
    AlignedSeries, AlignmentRules, CommonDateIndex, MissingAction, MissingStage, MissingValueEvent, ProcessedSeries,
};
use crate::error::PipelineError;
use crate::observe::PipelineObserver;

/// Output of the alignment stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub index: CommonDateIndex,
    /// One entry per processed series, same order.
    pub series: Vec<AlignedSeries>,
    /// Final-stage events (`STILL_MISSING`).
    pub events: Vec<MissingValueEvent>,
}

/// Align every processed series onto the common date index.
pub fn align_all(
    processed: &[ProcessedSeries],
    rules: &AlignmentRules,
    observer: &dyn PipelineObserver,
) -> Result<Alignment, PipelineError> {
    let index = common_date_index(processed, rules)?;
    observer.range_determined(&index);

    let mut series = Vec::with_capacity(processed.len());
    let mut events = Vec::new();

    for source in processed {
        let (aligned, event) = align_series(source, &index, rules);
        if let Some(event) = event {
            observer.missing_values(&event);
            events.push(event);
        }
        observer.series_aligned(&aligned);
        series.push(aligned);
    }

    Ok(Alignment { index, series, events })
}

/// Reindex one series and apply its fill policy.
///
/// Returns a `STILL_MISSING` event when an ordinary series cannot be completed.
pub fn align_series(
    source: &ProcessedSeries,
    index: &CommonDateIndex,
    rules: &AlignmentRules,
) -> (AlignedSeries, Option<MissingValueEvent>) {
    let mut values = reindex(source, &index.dates);
    let first_observed = source.first_observed();
    let inception_gap = rules.is_inception_gap(&source.column);

    let mut forward_filled = 0;
    let mut backward_filled = 0;
    let mut event = None;

    if inception_gap {
        if let Some(first) = first_observed {
            forward_filled = fill_after_inception(&mut values, &index.dates, first);
        }
    } else if values.iter().any(Option::is_none) {
        forward_filled = forward_fill(&mut values);
        backward_filled = backward_fill(&mut values);

        let still_missing = values.iter().filter(|v| v.is_none()).count();
        if still_missing > 0 {
            event = Some(MissingValueEvent::new(
                &source.column,
                MissingStage::Final,
                still_missing,
                MissingAction::StillMissing,
            ));
        }
    }

    let aligned = AlignedSeries {
        column: source.column.clone(),
        index: index.dates.clone(),
        values,
        first_observed,
        inception_gap,
        forward_filled,
        backward_filled,
    };
    (aligned, event)
}
