//! Reindexing and gap filling on the common index.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::ProcessedSeries;

/// Values of `series` at each of `dates` (`None` where not covered).
pub fn reindex(series: &ProcessedSeries, dates: &[NaiveDate]) -> Vec<Option<f64>> {
    let by_date: HashMap<NaiveDate, Option<f64>> = series
        .index
        .iter()
        .copied()
        .zip(series.values.iter().copied())
        .collect();
    dates
        .iter()
        .map(|d| by_date.get(d).copied().flatten())
        .collect()
}

/// Carry the last known value forward into absent slots. Returns slots filled.
pub fn forward_fill(values: &mut [Option<f64>]) -> usize {
    let mut carried: Option<f64> = None;
    let mut filled = 0;
    for slot in values.iter_mut() {
        match slot {
            Some(v) => carried = Some(*v),
            None => {
                if let Some(v) = carried {
                    *slot = Some(v);
                    filled += 1;
                }
            }
        }
    }
    filled
}

/// Carry the next known value backward into absent slots. Returns slots filled.
pub fn backward_fill(values: &mut [Option<f64>]) -> usize {
    let mut carried: Option<f64> = None;
    let mut filled = 0;
    for slot in values.iter_mut().rev() {
        match slot {
            Some(v) => carried = Some(*v),
            None => {
                if let Some(v) = carried {
                    *slot = Some(v);
                    filled += 1;
                }
            }
        }
    }
    filled
}

/// Forward fill only from `first_observed` on; earlier slots stay absent.
///
/// Leading absence means "did not exist yet", not "missing data".
pub fn fill_after_inception(values: &mut [Option<f64>], dates: &[NaiveDate], first_observed: NaiveDate) -> usize {
    let start = dates.partition_point(|d| *d < first_observed).min(values.len());
    for slot in values.iter_mut().take(start) {
        *slot = None;
    }
    forward_fill(&mut values[start..])
}
