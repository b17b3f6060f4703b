//! Calendar arithmetic on whole units, truncating partial periods.

use chrono::{Datelike, Months, NaiveDate};

/// Whole calendar months from `start` to `end`; negative when `end` precedes `start`.
///
/// Month ends clamp, so Jan 31 to Feb 28 is one whole month.
pub fn whole_months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    if end < start {
        return -whole_months_between(end, start);
    }

    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let reached = start
        .checked_add_months(Months::new(months as u32))
        .map(|anniversary| anniversary <= end)
        .unwrap_or(false);
    if !reached {
        months -= 1;
    }
    months
}

pub fn whole_years_between(start: NaiveDate, end: NaiveDate) -> i32 {
    whole_months_between(start, end) / 12
}

pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

pub fn whole_weeks_between(start: NaiveDate, end: NaiveDate) -> i64 {
    days_between(start, end) / 7
}
