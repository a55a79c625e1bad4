//! Convert a dated series to month-end frequency.
//!
//! Every policy produces one value slot per calendar month between the first
//! and last observation, so the output index is strictly increasing month-ends
//! with no duplicates. Months without observations are `None` except under
//! forward fill.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::ResamplePolicy;
use crate::resample::calendar::{is_month_end, month_end, month_ends_between, months_between};

/// A month-end indexed series, as produced by the resampler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthEndSeries {
    pub index: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl MonthEndSeries {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// Per-month accumulator.
#[derive(Debug, Clone, Copy)]
struct MonthBucket {
    last_date: NaiveDate,
    last: f64,
    sum: f64,
    count: usize,
}

impl MonthBucket {
    fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            last_date: date,
            last: value,
            sum: value,
            count: 1,
        }
    }

    fn push(&mut self, date: NaiveDate, value: f64) {
        // Equal dates: the later input row wins.
        if date >= self.last_date {
            self.last_date = date;
            self.last = value;
        }
        self.sum += value;
        self.count += 1;
    }
}

/// Resample observations onto month-end dates with the given policy.
///
/// Observations do not need to be sorted.
pub fn resample_to_month_end(observations: &[(NaiveDate, f64)], policy: ResamplePolicy) -> MonthEndSeries {
    match policy {
        ResamplePolicy::None if is_month_end_aligned(observations) => MonthEndSeries {
            index: observations.iter().map(|(d, _)| *d).collect(),
            values: observations.iter().map(|(_, v)| Some(*v)).collect(),
        },
        ResamplePolicy::None | ResamplePolicy::Last => aggregate(observations, |b| b.last),
        ResamplePolicy::Mean => aggregate(observations, |b| b.sum / b.count as f64),
        ResamplePolicy::Sum => aggregate(observations, |b| b.sum),
        ResamplePolicy::ForwardFill => forward_fill(observations),
    }
}

/// True when every date is a month-end and each step is exactly one month,
/// i.e. the series already is its own dense month-end index.
pub fn is_month_end_aligned(observations: &[(NaiveDate, f64)]) -> bool {
    observations.iter().all(|(d, _)| is_month_end(*d))
        && observations.windows(2).all(|w| months_between(w[0].0, w[1].0) == 1)
}

fn bucket_by_month(observations: &[(NaiveDate, f64)]) -> BTreeMap<NaiveDate, MonthBucket> {
    let mut buckets: BTreeMap<NaiveDate, MonthBucket> = BTreeMap::new();
    for &(date, value) in observations {
        buckets
            .entry(month_end(date))
            .and_modify(|b| b.push(date, value))
            .or_insert_with(|| MonthBucket::new(date, value));
    }
    buckets
}

fn full_month_index(buckets: &BTreeMap<NaiveDate, MonthBucket>) -> Vec<NaiveDate> {
    match (buckets.keys().next(), buckets.keys().next_back()) {
        (Some(first), Some(last)) => month_ends_between(*first, *last),
        _ => Vec::new(),
    }
}

fn aggregate(observations: &[(NaiveDate, f64)], reduce: impl Fn(&MonthBucket) -> f64) -> MonthEndSeries {
    let buckets = bucket_by_month(observations);
    let index = full_month_index(&buckets);
    let values = index.iter().map(|d| buckets.get(d).map(&reduce)).collect();
    MonthEndSeries { index, values }
}

fn forward_fill(observations: &[(NaiveDate, f64)]) -> MonthEndSeries {
    let buckets = bucket_by_month(observations);
    let index = full_month_index(&buckets);

    let mut carried: Option<f64> = None;
    let mut values = Vec::with_capacity(index.len());
    for d in &index {
        if let Some(b) = buckets.get(d) {
            carried = Some(b.last);
        }
        values.push(carried);
    }
    MonthEndSeries { index, values }
}
