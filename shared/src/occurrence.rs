use std::iter;

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// The next `count` dates falling on `day`, starting at `from` inclusive.
///
/// Dates are one week apart and ascending. The series stops early only if
/// it would run past the end of the representable calendar.
pub fn next_occurrences(day: Weekday, count: usize, from: NaiveDate) -> Vec<NaiveDate> {
    let offset = (7 + day.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;

    let Some(first) = from.checked_add_days(Days::new(u64::from(offset))) else {
        return Vec::new();
    };

    iter::successors(Some(first), |date| date.checked_add_days(Days::new(7)))
        .take(count)
        .collect()
}
