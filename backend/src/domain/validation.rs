//! Input validation applied at the edge, before requests reach the core.

use chrono::NaiveDate;

/// Rejected request input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Date must be a calendar date in YYYY-MM-DD format: {0}")]
    InvalidDate(String),
    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },
    #[error("Invalid calendar month: {year}-{month}")]
    InvalidMonth { year: u32, month: u32 },
}

/// Check that `date` is a zero-padded `YYYY-MM-DD` string naming a real day.
///
/// Range filtering and monthly grouping compare these strings directly, so
/// the fixed width matters as much as the calendar check.
pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(ValidationError::InvalidDate(date.to_string()));
    }

    Ok(())
}

/// Check that a calendar month can be rendered with four-digit date keys
pub fn validate_month(year: u32, month: u32) -> Result<(), ValidationError> {
    if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
        return Err(ValidationError::InvalidMonth { year, month });
    }
    Ok(())
}
