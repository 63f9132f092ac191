//! History export: read, filter, render, deliver.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tally_domain::{DateRange, KindSelection, LedgerEntry, UserId};
use tracing::{info, warn};

use crate::{filter::filter_ledger, storage::RecordStore, transport::ChatTransport, CoreError};

pub const NO_RECORDS: &str = "No records found in the specified date range.";
pub const NO_RECORDS_IN_RANGE: &str = "No records found within the selected date range!";

/// Lays out lines of text top to bottom and writes the document to `target`.
pub trait DocumentRenderer: Send + Sync {
    /// File extension of produced documents, without the dot.
    fn extension(&self) -> &str;

    fn render(&self, lines: &[String], target: &Path) -> Result<(), CoreError>;
}

/// A completed export dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub kind: KindSelection,
    pub range: DateRange,
}

impl ExportRequest {
    pub fn caption(&self) -> String {
        format!("{} history from {}", self.kind.label(), self.range)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The user has no stored history for the selected kind.
    EmptyLedger,
    /// History exists but nothing falls inside the requested range.
    NothingInRange,
    Delivered { records: usize },
}

/// One rendered line per entry, e.g. `12.50$ Food on 2024-03-15`.
pub fn export_line(entry: &LedgerEntry) -> String {
    format!("{}$ {} on {}", entry.amount, entry.category, entry.date_label())
}

pub struct ExportService {
    store: Arc<dyn RecordStore>,
    renderer: Arc<dyn DocumentRenderer>,
    export_dir: PathBuf,
}

impl ExportService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        renderer: Arc<dyn DocumentRenderer>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            renderer,
            export_dir,
        }
    }

    /// Document path for a user's export; stable across requests.
    pub fn export_path(&self, user: &UserId) -> PathBuf {
        self.export_dir
            .join(format!("history_{}.{}", user, self.renderer.extension()))
    }

    pub fn export(
        &self,
        transport: &dyn ChatTransport,
        user: &UserId,
        request: &ExportRequest,
    ) -> Result<ExportOutcome, CoreError> {
        let lines = self.store.read_all(user, request.kind.ledger_kind())?;
        if lines.is_empty() {
            transport.send_message(user, NO_RECORDS)?;
            return Ok(ExportOutcome::EmptyLedger);
        }

        let entries = filter_ledger(lines.as_slice(), &request.range);
        if entries.is_empty() {
            transport.send_message(user, NO_RECORDS_IN_RANGE)?;
            return Ok(ExportOutcome::NothingInRange);
        }

        let rendered: Vec<String> = entries.iter().map(export_line).collect();
        fs::create_dir_all(&self.export_dir)?;
        let path = self.export_path(user);
        self.renderer.render(&rendered, &path)?;

        let sent = transport.send_document(user, &path, &request.caption());
        if let Err(err) = fs::remove_file(&path) {
            warn!(path = %path.display(), error = %err, "could not remove rendered export");
        }
        sent?;

        info!(
            user = %user,
            kind = %request.kind,
            records = rendered.len(),
            "history export delivered"
        );
        Ok(ExportOutcome::Delivered {
            records: rendered.len(),
        })
    }
}
