//! Chat transport seam and inbound message model.

use std::path::Path;

use tally_domain::UserId;

use crate::CoreError;

/// Opaque handle to a file held by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub id: String,
    pub file_name: Option<String>,
}

impl FileRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: None,
        }
    }

    pub fn named(id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: Some(file_name.into()),
        }
    }

    /// Display name used in notices and logs.
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Photos(Vec<FileRef>),
    Document { file_name: String, file: FileRef },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub user: UserId,
    pub content: MessageContent,
}

impl IncomingMessage {
    pub fn text(user: UserId, text: impl Into<String>) -> Self {
        Self {
            user,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn photos(user: UserId, photos: Vec<FileRef>) -> Self {
        Self {
            user,
            content: MessageContent::Photos(photos),
        }
    }

    pub fn document(user: UserId, file_name: impl Into<String>, file: FileRef) -> Self {
        Self {
            user,
            content: MessageContent::Document {
                file_name: file_name.into(),
                file,
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Outbound operations the bot needs from a chat platform.
pub trait ChatTransport {
    fn send_message(&self, user: &UserId, text: &str) -> Result<(), CoreError>;

    /// Sends a prompt with a fixed set of answers. Platforms without reply
    /// keyboards fall back to listing the options in the message body.
    fn send_choices(&self, user: &UserId, text: &str, options: &[&str]) -> Result<(), CoreError> {
        let listing = options
            .iter()
            .map(|option| format!("- {option}"))
            .collect::<Vec<_>>()
            .join("\n");
        self.send_message(user, &format!("{text}\n{listing}"))
    }

    fn send_document(&self, user: &UserId, path: &Path, caption: &str) -> Result<(), CoreError>;

    fn download_file(&self, file: &FileRef) -> Result<Vec<u8>, CoreError>;
}
