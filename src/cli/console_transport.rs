use std::{
    fs,
    path::{Path, PathBuf},
};

use tally_core::{ChatTransport, CoreError, FileRef};
use tally_domain::UserId;

use super::output;

/// Chat transport backed by the terminal. File references are local paths and
/// delivered documents are copied into the outbox directory.
#[derive(Debug, Clone)]
pub struct ConsoleTransport {
    outbox: PathBuf,
}

impl ConsoleTransport {
    pub fn new(outbox: PathBuf) -> Self {
        Self { outbox }
    }

    pub fn outbox(&self) -> &Path {
        &self.outbox
    }
}

impl ChatTransport for ConsoleTransport {
    fn send_message(&self, _user: &UserId, text: &str) -> Result<(), CoreError> {
        output::bot(text);
        Ok(())
    }

    fn send_choices(&self, _user: &UserId, text: &str, options: &[&str]) -> Result<(), CoreError> {
        let keyboard = options
            .iter()
            .map(|option| format!("[{option}]"))
            .collect::<Vec<_>>()
            .join(" ");
        output::bot(format!("{text}\n{keyboard}"));
        Ok(())
    }

    fn send_document(&self, _user: &UserId, path: &Path, caption: &str) -> Result<(), CoreError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| CoreError::Transport(format!("{} has no file name", path.display())))?;
        fs::create_dir_all(&self.outbox)?;
        let delivered = self.outbox.join(file_name);
        fs::copy(path, &delivered)?;
        output::document(format!("{} ({})", caption, delivered.display()));
        Ok(())
    }

    fn download_file(&self, file: &FileRef) -> Result<Vec<u8>, CoreError> {
        fs::read(&file.id).map_err(|err| {
            CoreError::Transport(format!("could not read {}: {}", file.id, err))
        })
    }
}
