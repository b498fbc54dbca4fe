//! Explicit observation date range.

use chrono::NaiveDate;

use crate::QueryError;

/// Date format accepted for `start_date` and `end_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of observation dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvertedRange`] if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, QueryError> {
        if end < start {
            return Err(QueryError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidDate`] if either string does not parse,
    /// or [`QueryError::InvertedRange`] if the end precedes the start.
    pub fn parse(start: &str, end: &str) -> Result<Self, QueryError> {
        let start = parse_date("start_date", start)?;
        let end = parse_date("end_date", end)?;
        Self::new(start, end)
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Parses a zero-padded `YYYY-MM-DD` date.
fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, QueryError> {
    let invalid = || QueryError::InvalidDate {
        field,
        value: value.to_string(),
    };
    // chrono accepts unpadded months and days
    if value.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}
