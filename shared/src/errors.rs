//! Error types for calorie tracking calculations

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while deriving calorie goals from body metrics
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalorieError {
    /// One or more BMR inputs are missing
    #[error("User parameters are incomplete for BMR calculation: missing {}", .0.join(", "))]
    IncompleteParameters(Vec<&'static str>),
}

/// Errors raised while expanding a reporting date range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("startDate {start} must not be after endDate {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },

    #[error("Date range spans {days} days, at most {max} are allowed")]
    TooLong { days: i64, max: u32 },
}
