//! Native frequency inference.

use chrono::NaiveDate;

use crate::domain::Frequency;
use crate::resample::calendar::months_between;

/// Longest gap (in days) still treated as daily data.
///
/// Covers weekends and a holiday next to a weekend for business-day series.
const MAX_DAILY_GAP_DAYS: i64 = 4;

/// Infer the sampling frequency from sorted, unique dates.
///
/// Never fails: anything that does not fit daily, monthly or quarterly spacing
/// (including fewer than two dates) is reported as `Irregular`.
pub fn infer_frequency(dates: &[NaiveDate]) -> Frequency {
    if dates.len() < 2 {
        return Frequency::Irregular;
    }

    let is_daily = dates.windows(2).all(|w| {
        let gap = (w[1] - w[0]).num_days();
        (1..=MAX_DAILY_GAP_DAYS).contains(&gap)
    });
    if is_daily {
        return Frequency::Daily;
    }

    let mut steps = dates.windows(2).map(|w| months_between(w[0], w[1]));
    let Some(first_step) = steps.next() else {
        return Frequency::Irregular;
    };
    if !steps.all(|s| s == first_step) {
        return Frequency::Irregular;
    }

    match first_step {
        1 => Frequency::Monthly,
        3 => Frequency::Quarterly,
        _ => Frequency::Irregular,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn business_days_are_daily() {
        // Thu, Fri, Tue (long weekend), Wed
        let dates = [d(2024, 5, 23), d(2024, 5, 24), d(2024, 5, 28), d(2024, 5, 29)];
        assert_eq!(infer_frequency(&dates), Frequency::Daily);
    }

    #[test]
    fn month_starts_and_month_ends_are_monthly() {
        let starts = [d(2001, 1, 1), d(2001, 2, 1), d(2001, 3, 1)];
        assert_eq!(infer_frequency(&starts), Frequency::Monthly);

        let ends = [d(2001, 1, 31), d(2001, 2, 28), d(2001, 3, 31)];
        assert_eq!(infer_frequency(&ends), Frequency::Monthly);
    }

    #[test]
    fn quarter_starts_are_quarterly() {
        let dates = [d(2001, 1, 1), d(2001, 4, 1), d(2001, 7, 1), d(2001, 10, 1), d(2002, 1, 1)];
        assert_eq!(infer_frequency(&dates), Frequency::Quarterly);
    }

    #[test]
    fn irregular_spacing_is_reported_not_rejected() {
        let dates = [d(2001, 1, 1), d(2001, 2, 1), d(2001, 5, 1)];
        assert_eq!(infer_frequency(&dates), Frequency::Irregular);

        assert_eq!(infer_frequency(&[d(2001, 1, 1)]), Frequency::Irregular);
        assert_eq!(infer_frequency(&[]), Frequency::Irregular);

        let weekly = [d(2001, 1, 1), d(2001, 1, 8), d(2001, 1, 15)];
        assert_eq!(infer_frequency(&weekly), Frequency::Irregular);
    }
}
