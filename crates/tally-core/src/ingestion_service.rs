//! Receipt ingestion: extraction per image, then one ledger append per success.

use std::sync::Arc;

use tally_domain::{ExtractedRecord, RecordKind, TransactionRecord, UserId};
use tracing::{info, warn};

use crate::{
    archive::{read_receipt_archive, DEFAULT_IMAGE_EXTENSIONS},
    extraction::{ExtractionAdapter, ExtractionOutcome, ReceiptImage},
    storage::RecordStore,
    transport::{ChatTransport, FileRef},
    CoreError,
};

pub const ARCHIVE_COMPLETED: &str = "All receipts from the zip file have been added to the database.";
pub const BATCH_COMPLETED: &str = "All receipts have been added to the database.";

/// Counts of per-image outcomes for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub added: usize,
    pub failed: usize,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.added + self.failed
    }
}

pub struct IngestionPipeline {
    store: Arc<dyn RecordStore>,
    adapter: ExtractionAdapter,
    image_extensions: Vec<String>,
}

impl IngestionPipeline {
    pub fn new(store: Arc<dyn RecordStore>, adapter: ExtractionAdapter) -> Self {
        Self {
            store,
            adapter,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }

    pub fn with_image_extensions(mut self, extensions: Vec<String>) -> Self {
        if !extensions.is_empty() {
            self.image_extensions = extensions;
        }
        self
    }

    pub fn image_extensions(&self) -> &[String] {
        &self.image_extensions
    }

    /// Unpacks a zip archive and ingests every image member.
    pub fn ingest_archive(
        &self,
        transport: &dyn ChatTransport,
        user: &UserId,
        archive: &[u8],
    ) -> Result<IngestReport, CoreError> {
        let images = read_receipt_archive(archive, self.image_extensions.as_slice())?;
        self.ingest(transport, user, images.into_iter().map(Ok), ARCHIVE_COMPLETED)
    }

    /// Ingests individually uploaded images in the order received.
    pub fn ingest_images(
        &self,
        transport: &dyn ChatTransport,
        user: &UserId,
        images: Vec<ReceiptImage>,
    ) -> Result<IngestReport, CoreError> {
        self.ingest(transport, user, images.into_iter().map(Ok), BATCH_COMPLETED)
    }

    /// Downloads and ingests uploaded photos one at a time. A photo that
    /// cannot be fetched gets its own failure notice and the batch goes on.
    pub fn ingest_files(
        &self,
        transport: &dyn ChatTransport,
        user: &UserId,
        files: &[FileRef],
    ) -> Result<IngestReport, CoreError> {
        let images = files.iter().map(|file| {
            transport
                .download_file(file)
                .map(|bytes| ReceiptImage::new(file.display_name(), bytes))
                .map_err(|err| {
                    warn!(user = %user, file = %file.id, error = %err, "receipt download failed");
                    format!("Could not download receipt {}: {}", file.display_name(), err)
                })
        });
        self.ingest(transport, user, images, BATCH_COMPLETED)
    }

    fn ingest<I>(
        &self,
        transport: &dyn ChatTransport,
        user: &UserId,
        images: I,
        completion: &str,
    ) -> Result<IngestReport, CoreError>
    where
        I: IntoIterator<Item = Result<ReceiptImage, String>>,
    {
        let mut report = IngestReport::default();
        for image in images {
            let outcome = match image {
                Ok(image) => self.adapter.process(&image),
                Err(reason) => ExtractionOutcome::Failed(reason),
            };
            match outcome {
                ExtractionOutcome::Extracted(record) => {
                    self.store_record(user, &record)?;
                    transport.send_message(user, &confirmation(&record))?;
                    report.added += 1;
                }
                ExtractionOutcome::Failed(reason) => {
                    transport.send_message(user, &reason)?;
                    report.failed += 1;
                }
            }
        }
        transport.send_message(user, completion)?;
        info!(
            user = %user,
            added = report.added,
            failed = report.failed,
            "receipt batch processed"
        );
        Ok(report)
    }

    fn store_record(&self, user: &UserId, record: &ExtractedRecord) -> Result<(), CoreError> {
        let line = TransactionRecord::from_extracted(record).to_line();
        self.store.append(user, RecordKind::Expense, &line)
    }
}

fn confirmation(record: &ExtractedRecord) -> String {
    format!(
        "Added successfully! to the database.\nReceipt Details:\nDate: {}\nAmount: {}\nCategory: {}",
        tally_domain::format_user_date(record.date),
        record.amount,
        record.category
    )
}
