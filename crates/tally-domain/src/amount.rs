//! Monetary amounts stored as whole cents.

use std::fmt;

/// Non-negative amount with two fractional digits of precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    cents: u64,
}

impl Amount {
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    /// Rounds a decimal value to the nearest cent. Returns `None` for negative,
    /// NaN or infinite input.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents > u64::MAX as f64 {
            return None;
        }
        Some(Self {
            cents: cents as u64,
        })
    }

    pub fn cents(&self) -> u64 {
        self.cents
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}
