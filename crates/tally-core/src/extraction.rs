use std::{convert::TryFrom, sync::Arc};

use tally_domain::{ExtractedRecord, RawExtraction};
use tracing::{debug, warn};

use crate::CoreError;

pub const NOT_A_RECEIPT: &str = "Image is not a receipt.";

/// One receipt image, from an archive member or an uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ReceiptImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// External OCR service turning an image into receipt fields.
///
/// `Ok(None)` means the service found no receipt; `Err` carries the service's
/// own error text.
pub trait ReceiptExtractor: Send + Sync {
    fn extract(&self, image: &ReceiptImage) -> Result<Option<RawExtraction>, CoreError>;
}

/// Result of running one image through the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Extracted(ExtractedRecord),
    /// Human readable reason, sent to the user as is.
    Failed(String),
}

/// Wraps a [`ReceiptExtractor`] and validates its replies.
#[derive(Clone)]
pub struct ExtractionAdapter {
    extractor: Arc<dyn ReceiptExtractor>,
}

impl ExtractionAdapter {
    pub fn new(extractor: Arc<dyn ReceiptExtractor>) -> Self {
        Self { extractor }
    }

    pub fn process(&self, image: &ReceiptImage) -> ExtractionOutcome {
        let raw = match self.extractor.extract(image) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ExtractionOutcome::Failed(NOT_A_RECEIPT.to_string()),
            Err(CoreError::Extraction(message)) if !message.trim().is_empty() => {
                warn!(image = %image.name, error = %message, "extraction service rejected image");
                return ExtractionOutcome::Failed(message);
            }
            Err(err) => {
                warn!(image = %image.name, error = %err, "extraction failed");
                return ExtractionOutcome::Failed(format!(
                    "Could not read receipt {}: {}",
                    image.name, err
                ));
            }
        };
        debug!(image = %image.name, ?raw, "extracted receipt data");
        match ExtractedRecord::try_from(raw) {
            Ok(record) => ExtractionOutcome::Extracted(record),
            Err(err) => {
                warn!(image = %image.name, error = %err, "extraction reply failed validation");
                ExtractionOutcome::Failed(format!("Could not read receipt {}: {}", image.name, err))
            }
        }
    }
}
