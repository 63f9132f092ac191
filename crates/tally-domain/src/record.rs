//! Ledger lines and their canonical text form.
//!
//! A stored line reads `"<DD-Mon-YYYY HH:MM>,<category>,<amount>"`. The format
//! keeps the persisted document readable by hand, so every writer must go
//! through [`TransactionRecord::to_line`] to stay re-parseable.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::{amount::Amount, date::format_user_date, extraction::ExtractedRecord};

/// Canonical timestamp format for stored lines.
pub const TIMESTAMP_FORMAT: &str = "%d-%b-%Y %H:%M";
/// Date portion of [`TIMESTAMP_FORMAT`].
pub const LEDGER_DATE_FORMAT: &str = "%d-%b-%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub timestamp: NaiveDateTime,
    pub category: String,
    pub amount: Amount,
}

impl TransactionRecord {
    pub fn new(timestamp: NaiveDateTime, category: impl Into<String>, amount: Amount) -> Self {
        Self {
            timestamp,
            category: category.into(),
            amount,
        }
    }

    /// Receipts carry no time of day, so extracted records are stamped at midnight.
    pub fn from_extracted(record: &ExtractedRecord) -> Self {
        Self::new(
            record.date.and_time(NaiveTime::default()),
            record.category.clone(),
            record.amount,
        )
    }

    pub fn to_line(&self) -> String {
        format!(
            "{},{},{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.category,
            self.amount
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("line has fewer than three comma separated fields")]
    MissingFields,
    #[error("unrecognised ledger date `{0}`")]
    InvalidDate(String),
}

/// Normalized projection of a stored line: calendar date, category and the
/// amount text exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub category: String,
    pub amount: String,
}

impl LedgerEntry {
    pub fn date_label(&self) -> String {
        format_user_date(self.date)
    }

    /// `(YYYY-MM-DD, category, amount)` view of the entry.
    pub fn projection(&self) -> (String, &str, &str) {
        (self.date_label(), &self.category, &self.amount)
    }
}

/// Parses a stored line into a [`LedgerEntry`].
///
/// The timestamp ends at the first comma and the amount starts after the last
/// one; anything in between is the category. Only the date part of the
/// timestamp is interpreted, since manually entered lines may carry any time.
pub fn parse_ledger_line(line: &str) -> Result<LedgerEntry, RecordParseError> {
    let (timestamp, rest) = line.split_once(',').ok_or(RecordParseError::MissingFields)?;
    let (category, amount) = rest.rsplit_once(',').ok_or(RecordParseError::MissingFields)?;

    let timestamp = timestamp.trim();
    let date_part = timestamp
        .split_once(' ')
        .map(|(date, _)| date)
        .unwrap_or(timestamp);
    let date = NaiveDate::parse_from_str(date_part, LEDGER_DATE_FORMAT)
        .map_err(|_| RecordParseError::InvalidDate(timestamp.to_string()))?;

    Ok(LedgerEntry {
        date,
        category: category.to_string(),
        amount: amount.trim().to_string(),
    })
}
