//! Assemble aligned series into the merged panel.

use std::collections::HashSet;

use crate::domain::{AlignedSeries, CommonDateIndex, MergedPanel, PanelColumn};
use crate::error::PipelineError;

/// Concatenate aligned series column-wise onto the common index.
///
/// Every series must carry exactly the common index; anything else is an
/// `Alignment` error. Columns keep the order of `aligned`.
pub fn merge_panel(index: &CommonDateIndex, aligned: &[AlignedSeries]) -> Result<MergedPanel, PipelineError> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(aligned.len());

    for series in aligned {
        if !seen.insert(series.column.as_str()) {
            return Err(PipelineError::Alignment {
                column: series.column.clone(),
                message: "column appears more than once".to_string(),
            });
        }
        if series.index != index.dates {
            return Err(PipelineError::Alignment {
                column: series.column.clone(),
                message: format!(
                    "index has {} dates, common index has {}",
                    series.index.len(),
                    index.len()
                ),
            });
        }
        if series.values.len() != index.len() {
            return Err(PipelineError::Alignment {
                column: series.column.clone(),
                message: format!("{} values for {} dates", series.values.len(), index.len()),
            });
        }
        columns.push(PanelColumn {
            name: series.column.clone(),
            values: series.values.clone(),
        });
    }

    Ok(MergedPanel {
        index: index.dates.clone(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn index() -> CommonDateIndex {
        CommonDateIndex {
            anchor: "a".to_string(),
            bounded_by: "a".to_string(),
            dates: vec![
                NaiveDate::from_ymd_opt(2001, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2001, 3, 31).unwrap(),
            ],
        }
    }

    fn aligned(column: &str, dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> AlignedSeries {
        AlignedSeries {
            column: column.to_string(),
            first_observed: dates.first().copied(),
            index: dates,
            values,
            inception_gap: false,
            forward_filled: 0,
            backward_filled: 0,
        }
    }

    #[test]
    fn merges_matching_columns() {
        let idx = index();
        let series = vec![
            aligned("a", idx.dates.clone(), vec![Some(10.0), Some(12.0)]),
            aligned("b", idx.dates.clone(), vec![None, Some(1.0)]),
        ];
        let panel = merge_panel(&idx, &series).unwrap();
        assert_eq!(panel.rows(), 2);
        assert_eq!(panel.width(), 2);
        assert_eq!(panel.column("b").unwrap().values, vec![None, Some(1.0)]);
    }

    #[test]
    fn mismatched_index_is_an_alignment_error() {
        let idx = index();
        let series = vec![aligned("a", idx.dates[..1].to_vec(), vec![Some(10.0)])];
        let err = merge_panel(&idx, &series).unwrap_err();
        assert!(matches!(err, PipelineError::Alignment { ref column, .. } if column == "a"));
    }

    #[test]
    fn short_values_are_an_alignment_error() {
        let idx = index();
        let series = vec![aligned("a", idx.dates.clone(), vec![Some(10.0)])];
        assert!(merge_panel(&idx, &series).is_err());
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let idx = index();
        let series = vec![
            aligned("a", idx.dates.clone(), vec![Some(1.0), Some(2.0)]),
            aligned("a", idx.dates.clone(), vec![Some(1.0), Some(2.0)]),
        ];
        assert!(merge_panel(&idx, &series).is_err());
    }
}
