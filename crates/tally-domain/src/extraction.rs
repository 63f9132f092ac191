//! Receipt extraction payloads.

use std::convert::TryFrom;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{amount::Amount, date::parse_user_date};

/// Reply of an extraction service before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExtraction {
    pub date: String,
    pub amount: f64,
    pub category: String,
}

/// Validated receipt fields, ready to become a ledger line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub date: NaiveDate,
    pub amount: Amount,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionValidationError {
    #[error("receipt date `{0}` is not a yyyy-mm-dd date")]
    Date(String),
    #[error("receipt amount {0} is not a non-negative number")]
    Amount(f64),
    #[error("receipt category is empty")]
    EmptyCategory,
}

impl TryFrom<RawExtraction> for ExtractedRecord {
    type Error = ExtractionValidationError;

    fn try_from(raw: RawExtraction) -> Result<Self, Self::Error> {
        let date = parse_user_date(&raw.date)
            .map_err(|_| ExtractionValidationError::Date(raw.date.clone()))?;
        let amount =
            Amount::from_decimal(raw.amount).ok_or(ExtractionValidationError::Amount(raw.amount))?;
        if raw.category.trim().is_empty() {
            return Err(ExtractionValidationError::EmptyCategory);
        }
        Ok(Self {
            date,
            amount,
            category: raw.category,
        })
    }
}
