//! Month-end calendar helpers.

use chrono::{Datelike, NaiveDate};

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

pub fn is_month_end(date: NaiveDate) -> bool {
    month_end(date) == date
}

/// Signed number of calendar months from `from` to `to` (days ignored).
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

/// Month-end of the month after the one containing `date`.
pub fn next_month_end(date: NaiveDate) -> Option<NaiveDate> {
    month_end(date).succ_opt().map(month_end)
}

/// Every month-end from `start`'s month to `end`'s month, inclusive.
///
/// Empty when `start` falls in a later month than `end`.
pub fn month_ends_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let last = month_end(end);
    let mut out = Vec::new();
    let mut current = Some(month_end(start));
    while let Some(d) = current {
        if d > last {
            break;
        }
        out.push(d);
        current = next_month_end(d);
    }
    out
}
