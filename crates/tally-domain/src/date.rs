//! Date input parsing and inclusive date windows.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// Format accepted from users and used for projected ledger dates.
pub const USER_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{input}` is not a valid yyyy-mm-dd date")]
pub struct DateInputError {
    pub input: String,
}

/// Parses a strict `YYYY-MM-DD` date.
///
/// chrono alone accepts unpadded fields (`2024-3-1`), so the shape is checked
/// before the calendar validation.
pub fn parse_user_date(input: &str) -> Result<NaiveDate, DateInputError> {
    let trimmed = input.trim();
    let err = || DateInputError {
        input: trimmed.to_string(),
    };
    let well_formed = trimmed.len() == 10
        && trimmed.char_indices().all(|(idx, ch)| match idx {
            4 | 7 => ch == '-',
            _ => ch.is_ascii_digit(),
        });
    if !well_formed {
        return Err(err());
    }
    NaiveDate::parse_from_str(trimmed, USER_DATE_FORMAT).map_err(|_| err())
}

pub fn format_user_date(date: NaiveDate) -> String {
    date.format(USER_DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("end date {end} is before start date {start}")]
pub struct DateRangeError {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Closed interval of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if end < start {
            return Err(DateRangeError { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            format_user_date(self.start),
            format_user_date(self.end)
        )
    }
}
