//! Calendar-day ranges for nutrition history

use crate::errors::DateRangeError;
use chrono::NaiveDate;

/// Number of calendar days in `[start, end]`
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Every calendar day in `[start, end]`, ascending.
///
/// Rejects inverted ranges and ranges longer than `max_days`.
pub fn days_inclusive(
    start: NaiveDate,
    end: NaiveDate,
    max_days: u32,
) -> Result<Vec<NaiveDate>, DateRangeError> {
    if end < start {
        return Err(DateRangeError::Inverted { start, end });
    }

    let days = inclusive_day_count(start, end);
    if days > i64::from(max_days) {
        return Err(DateRangeError::TooLong {
            days,
            max: max_days,
        });
    }

    Ok(start.iter_days().take(days as usize).collect())
}
