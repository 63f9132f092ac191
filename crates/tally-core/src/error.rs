use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Extraction failed: {0}")]
    Extraction(String),
    #[error("Archive error: {0}")]
    Archive(String),
    #[error("Rendering failed: {0}")]
    Render(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<zip::result::ZipError> for CoreError {
    fn from(err: zip::result::ZipError) -> Self {
        CoreError::Archive(err.to_string())
    }
}
