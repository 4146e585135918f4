// Validation of user-supplied filter input
use crate::error::{Error, Result};
use chrono::NaiveDate;

/// Treat blank filter values as not provided
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a time limit in whole minutes
pub fn parse_time_limit(value: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|_| {
        Error::InvalidFilterInput(format!(
            "Time limit must be a whole number of minutes, got {value:?}"
        ))
    })
}

/// Parse a calendar date in `YYYY-MM-DD` form
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("Invalid date {value:?}, expected YYYY-MM-DD")))
}
