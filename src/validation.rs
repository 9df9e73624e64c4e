//! Input checks applied to typed request bodies before any mutation.

use crate::streak::parse_date_key;
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

pub const MAX_TITLE_LEN: usize = 200;
pub const DEFAULT_COLOR: &str = "#4f46e5";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("title must be at most 200 characters")]
    TitleTooLong,

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("progress must be between 0 and 100, got {0}")]
    ProgressOutOfRange(u8),

    #[error("date {date} is in the future")]
    FutureDate { date: NaiveDate },

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// Returns the trimmed title.
pub fn title(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(trimmed.to_string())
}

pub fn date(value: &str) -> Result<NaiveDate, ValidationError> {
    parse_date_key(value.trim()).ok_or_else(|| ValidationError::InvalidDate(value.to_string()))
}

pub fn time(value: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = value.trim();
    if trimmed.len() != 5 {
        return Err(ValidationError::InvalidTime(value.to_string()));
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

pub fn color(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let valid = trimmed.len() == 7
        && trimmed.starts_with('#')
        && trimmed[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(trimmed.to_ascii_lowercase())
    } else {
        Err(ValidationError::InvalidColor(value.to_string()))
    }
}

pub fn progress(value: u8) -> Result<u8, ValidationError> {
    if value > 100 {
        return Err(ValidationError::ProgressOutOfRange(value));
    }
    Ok(value)
}

/// Completions can only be logged for today or earlier.
pub fn not_in_future(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if date > today {
        return Err(ValidationError::FutureDate { date });
    }
    Ok(date)
}

pub fn date_range(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => Err(ValidationError::EndBeforeStart { start, end }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_and_bounded() {
        assert_eq!(title("  Read  ").unwrap(), "Read");
        assert_eq!(title("   "), Err(ValidationError::EmptyTitle));
        assert_eq!(title(&"x".repeat(201)), Err(ValidationError::TitleTooLong));
    }

    #[test]
    fn dates_and_times_are_strict() {
        assert!(date("2024-02-29").is_ok());
        assert!(date("2024-2-29").is_err());
        assert!(date("2023-02-29").is_err());
        assert!(time("09:30").is_ok());
        assert!(time("9:30").is_err());
        assert!(time("24:00").is_err());
    }

    #[test]
    fn colors_are_hex_triplets() {
        assert_eq!(color("#AABBCC").unwrap(), "#aabbcc");
        assert!(color("red").is_err());
        assert!(color("#abcd").is_err());
    }

    #[test]
    fn end_date_must_not_precede_start() {
        let start = date("2024-05-10").unwrap();
        assert!(date_range(start, None).is_ok());
        assert!(date_range(start, Some(start)).is_ok());
        assert!(date_range(start, date("2024-05-09").ok()).is_err());
        assert_eq!(progress(101), Err(ValidationError::ProgressOutOfRange(101)));
    }

    #[test]
    fn completion_dates_stop_at_today() {
        let today = date("2024-05-10").unwrap();
        assert_eq!(not_in_future(today, today), Ok(today));
        assert!(not_in_future(date("2024-05-09").unwrap(), today).is_ok());
        assert_eq!(
            not_in_future(date("2024-05-11").unwrap(), today),
            Err(ValidationError::FutureDate { date: date("2024-05-11").unwrap() })
        );
    }
}
