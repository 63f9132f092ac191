use std::{collections::HashMap, sync::Mutex};

use tally_domain::{RecordKind, UserId};

use crate::CoreError;

/// Append-only per-user ledger storage.
///
/// Each user owns one list of raw lines per [`RecordKind`]. Implementations
/// must keep insertion order and must persist before `append` returns.
pub trait RecordStore: Send + Sync {
    /// Returns every stored line for the user and kind, or an empty list when
    /// the user has no history.
    fn read_all(&self, user: &UserId, kind: RecordKind) -> Result<Vec<String>, CoreError>;

    /// Appends one line, creating the user's entry if needed.
    fn append(&self, user: &UserId, kind: RecordKind, line: &str) -> Result<(), CoreError>;
}

/// Process-local store used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    ledgers: Mutex<HashMap<(UserId, RecordKind), Vec<String>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user's ledger with existing lines.
    pub fn with_lines<I, S>(self, user: &UserId, kind: RecordKind, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut guard) = self.ledgers.lock() {
            guard
                .entry((user.clone(), kind))
                .or_default()
                .extend(lines.into_iter().map(Into::into));
        }
        self
    }
}

impl RecordStore for InMemoryRecordStore {
    fn read_all(&self, user: &UserId, kind: RecordKind) -> Result<Vec<String>, CoreError> {
        let guard = self
            .ledgers
            .lock()
            .map_err(|_| CoreError::Storage("record store lock poisoned".into()))?;
        Ok(guard
            .get(&(user.clone(), kind))
            .cloned()
            .unwrap_or_default())
    }

    fn append(&self, user: &UserId, kind: RecordKind, line: &str) -> Result<(), CoreError> {
        let mut guard = self
            .ledgers
            .lock()
            .map_err(|_| CoreError::Storage("record store lock poisoned".into()))?;
        guard
            .entry((user.clone(), kind))
            .or_default()
            .push(line.to_string());
        Ok(())
    }
}
