//! Common date range selection.
//!
//! Lower bound: first observed month of the anchor series.
//! Upper bound: the earliest last observed month over all series, so no
//! series contributes dates past its own coverage.

use chrono::NaiveDate;

use crate::domain::{AlignmentRules, AnchorRule, CommonDateIndex, ProcessedSeries};
use crate::error::PipelineError;
use crate::resample::month_ends_between;

/// Pick the series whose first observation anchors the range.
pub fn select_anchor<'a>(
    processed: &'a [ProcessedSeries],
    rules: &AlignmentRules,
) -> Result<(&'a ProcessedSeries, NaiveDate), PipelineError> {
    match &rules.anchor {
        AnchorRule::Column(name) => {
            let series = processed
                .iter()
                .find(|s| &s.column == name)
                .ok_or_else(|| PipelineError::MissingAnchor(format!("series `{name}` was not processed")))?;
            let start = series
                .first_observed()
                .ok_or_else(|| PipelineError::MissingAnchor(format!("series `{name}` has no observations")))?;
            Ok((series, start))
        }
        AnchorRule::LatestStart => {
            let mut best: Option<(&ProcessedSeries, NaiveDate)> = None;
            for series in processed.iter().filter(|s| !rules.is_inception_gap(&s.column)) {
                let Some(start) = series.first_observed() else {
                    continue;
                };
                // Strictly later only: ties keep the earlier catalog entry.
                if best.is_none_or(|(_, b)| start > b) {
                    best = Some((series, start));
                }
            }
            best.ok_or_else(|| {
                PipelineError::MissingAnchor("no series with observations is eligible to anchor the range".to_string())
            })
        }
    }
}

/// The series with the earliest last observation, and that date.
///
/// Series without any observation are ignored here; alignment flags them.
pub fn upper_bound(processed: &[ProcessedSeries]) -> Option<(&ProcessedSeries, NaiveDate)> {
    let mut best: Option<(&ProcessedSeries, NaiveDate)> = None;
    for series in processed {
        let Some(end) = series.last_observed() else {
            continue;
        };
        if best.is_none_or(|(_, b)| end < b) {
            best = Some((series, end));
        }
    }
    best
}

/// Build the month-end index every series is aligned to.
pub fn common_date_index(
    processed: &[ProcessedSeries],
    rules: &AlignmentRules,
) -> Result<CommonDateIndex, PipelineError> {
    let (anchor, start) = select_anchor(processed, rules)?;
    let (bounding, end) = upper_bound(processed)
        .ok_or_else(|| PipelineError::MissingAnchor("no series has observations".to_string()))?;

    if start > end {
        return Err(PipelineError::EmptyDateRange { start, end });
    }

    Ok(CommonDateIndex {
        anchor: anchor.column.clone(),
        bounded_by: bounding.column.clone(),
        dates: month_ends_between(start, end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, ResamplePolicy};
    use crate::resample::month_end;

    fn me(y: i32, m: u32) -> NaiveDate {
        month_end(NaiveDate::from_ymd_opt(y, m, 1).unwrap())
    }

    fn series(column: &str, start: NaiveDate, end: NaiveDate) -> ProcessedSeries {
        let index = month_ends_between(start, end);
        let values = vec![Some(1.0); index.len()];
        ProcessedSeries {
            source: format!("{column}.csv"),
            column: column.to_string(),
            policy: ResamplePolicy::Last,
            frequency: Frequency::Monthly,
            index,
            values,
        }
    }

    fn rules(anchor: AnchorRule) -> AlignmentRules {
        AlignmentRules {
            anchor,
            inception_gap: vec!["btc".to_string()],
        }
    }

    fn sample() -> Vec<ProcessedSeries> {
        vec![
            series("m2", me(1990, 1), me(2024, 6)),
            series("gold", me(2001, 2), me(2024, 8)),
            series("btc", me(2014, 9), me(2024, 9)),
            series("vix", me(1995, 1), me(2024, 7)),
        ]
    }

    #[test]
    fn fixed_anchor_and_earliest_end() {
        let index = common_date_index(&sample(), &rules(AnchorRule::Column("gold".to_string()))).unwrap();
        assert_eq!(index.anchor, "gold");
        assert_eq!(index.bounded_by, "m2");
        assert_eq!(index.start(), Some(me(2001, 2)));
        assert_eq!(index.end(), Some(me(2024, 6)));
        assert_eq!(index.len(), 23 * 12 + 5);
    }

    #[test]
    fn latest_start_ignores_inception_gap_series() {
        let data = sample();
        let (anchor, start) = select_anchor(&data, &rules(AnchorRule::LatestStart)).unwrap();
        assert_eq!(anchor.column, "gold");
        assert_eq!(start, me(2001, 2));
    }

    #[test]
    fn latest_start_ties_keep_catalog_order() {
        let data = vec![
            series("first", me(2001, 2), me(2024, 1)),
            series("second", me(2001, 2), me(2024, 1)),
        ];
        let (anchor, _) = select_anchor(&data, &rules(AnchorRule::LatestStart)).unwrap();
        assert_eq!(anchor.column, "first");
    }

    #[test]
    fn missing_anchor_is_fatal() {
        let data: Vec<ProcessedSeries> = sample().into_iter().filter(|s| s.column != "gold").collect();
        let err = common_date_index(&data, &rules(AnchorRule::Column("gold".to_string()))).unwrap_err();
        assert!(matches!(err, PipelineError::MissingAnchor(_)));

        let err = common_date_index(&[], &rules(AnchorRule::LatestStart)).unwrap_err();
        assert!(matches!(err, PipelineError::MissingAnchor(_)));
    }

    #[test]
    fn anchor_without_values_is_fatal() {
        let mut data = sample();
        data[1].values = vec![None; data[1].index.len()];
        let err = common_date_index(&data, &rules(AnchorRule::Column("gold".to_string()))).unwrap_err();
        assert!(matches!(err, PipelineError::MissingAnchor(_)));
    }

    #[test]
    fn anchor_after_upper_bound_is_an_empty_range() {
        let data = vec![
            series("gold", me(2010, 1), me(2020, 1)),
            series("old", me(1990, 1), me(2005, 1)),
        ];
        let err = common_date_index(&data, &rules(AnchorRule::Column("gold".to_string()))).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDateRange { .. }));
    }
}
