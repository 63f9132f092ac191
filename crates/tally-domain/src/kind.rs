use std::fmt;

use serde::{Deserialize, Serialize};

/// Income/expense discriminator. Each kind owns one ledger list per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Income, RecordKind::Expense];

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Income => "Income",
            RecordKind::Expense => "Expense",
        }
    }

    /// Name of the list holding this kind's lines inside a user's store entry.
    pub fn ledger_field(&self) -> &'static str {
        match self {
            RecordKind::Income => "income_data",
            RecordKind::Expense => "data",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(RecordKind::label).collect()
    }

    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user answered when asked for a kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindSelection {
    Known(RecordKind),
    /// Free text outside the offered options, carried forward as typed.
    Unrecognized(String),
}

impl KindSelection {
    pub fn from_input(input: &str) -> Self {
        match RecordKind::parse(input) {
            Some(kind) => KindSelection::Known(kind),
            None => KindSelection::Unrecognized(input.trim().to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, KindSelection::Known(_))
    }

    pub fn label(&self) -> &str {
        match self {
            KindSelection::Known(kind) => kind.label(),
            KindSelection::Unrecognized(raw) => raw,
        }
    }

    /// Ledger to read for this selection. Unrecognized text falls back to the
    /// expense list, which is the default history.
    pub fn ledger_kind(&self) -> RecordKind {
        match self {
            KindSelection::Known(kind) => *kind,
            KindSelection::Unrecognized(_) => RecordKind::Expense,
        }
    }
}

impl fmt::Display for KindSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
