//! Multi-turn dialogs and the per-user table of dialogs in progress.

pub mod export_dialog;
pub mod upload_dialog;

use std::collections::HashMap;

use tally_domain::UserId;

pub use export_dialog::{DialogOptions, ExportDialog, ExportStep};
pub use upload_dialog::{classify_upload, UploadPayload};

/// A dialog waiting for the user's next message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Export(ExportDialog),
    Upload,
}

/// In-memory continuation state, keyed by chat identity. Lost on restart.
#[derive(Debug, Default)]
pub struct SessionTable {
    active: HashMap<UserId, Dialog>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `dialog` as the user's next handler, returning any dialog it replaced.
    pub fn begin(&mut self, user: &UserId, dialog: Dialog) -> Option<Dialog> {
        self.active.insert(user.clone(), dialog)
    }

    /// Removes and returns the user's pending dialog.
    pub fn take(&mut self, user: &UserId) -> Option<Dialog> {
        self.active.remove(user)
    }

    pub fn get(&self, user: &UserId) -> Option<&Dialog> {
        self.active.get(user)
    }

    pub fn is_active(&self, user: &UserId) -> bool {
        self.active.contains_key(user)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
