#![allow(dead_code)]

use std::{
    collections::HashMap,
    fs,
    io::{Cursor, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use once_cell::sync::Lazy;
use tally_bot::TallyBot;
use tally_config::Config;
use tally_core::{ChatTransport, CoreError, FileRef, ReceiptExtractor, ReceiptImage, RecordStore};
use tally_domain::{RawExtraction, UserId};
use tally_storage_json::JsonRecordStore;
use tempfile::TempDir;
use zip::{write::FileOptions, ZipWriter};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message(String),
    Choices(String, Vec<String>),
    Document { caption: String, body: String },
}

/// Captures everything the bot sends. Downloads read local paths.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn drain(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent().into_iter().rev().find_map(|sent| match sent {
            Sent::Message(text) | Sent::Choices(text, _) => Some(text),
            Sent::Document { .. } => None,
        })
    }

    pub fn documents(&self) -> Vec<(String, String)> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Document { caption, body } => Some((caption, body)),
                _ => None,
            })
            .collect()
    }
}

impl ChatTransport for RecordingTransport {
    fn send_message(&self, _user: &UserId, text: &str) -> Result<(), CoreError> {
        self.sent.lock().unwrap().push(Sent::Message(text.to_string()));
        Ok(())
    }

    fn send_choices(&self, _user: &UserId, text: &str, options: &[&str]) -> Result<(), CoreError> {
        self.sent.lock().unwrap().push(Sent::Choices(
            text.to_string(),
            options.iter().map(|option| option.to_string()).collect(),
        ));
        Ok(())
    }

    fn send_document(&self, _user: &UserId, path: &Path, caption: &str) -> Result<(), CoreError> {
        let body = fs::read_to_string(path)?;
        self.sent.lock().unwrap().push(Sent::Document {
            caption: caption.to_string(),
            body,
        });
        Ok(())
    }

    fn download_file(&self, file: &FileRef) -> Result<Vec<u8>, CoreError> {
        Ok(fs::read(&file.id)?)
    }
}

/// Replies keyed by image name; unknown images are "not a receipt".
#[derive(Default)]
pub struct StubExtractor {
    replies: HashMap<String, Result<RawExtraction, String>>,
}

impl StubExtractor {
    pub fn receipt(mut self, image: &str, date: &str, amount: f64, category: &str) -> Self {
        self.replies.insert(
            image.to_string(),
            Ok(RawExtraction {
                date: date.to_string(),
                amount,
                category: category.to_string(),
            }),
        );
        self
    }

    pub fn failure(mut self, image: &str, message: &str) -> Self {
        self.replies
            .insert(image.to_string(), Err(message.to_string()));
        self
    }
}

impl ReceiptExtractor for StubExtractor {
    fn extract(&self, image: &ReceiptImage) -> Result<Option<RawExtraction>, CoreError> {
        match self.replies.get(&image.name) {
            Some(Ok(raw)) => Ok(Some(raw.clone())),
            Some(Err(message)) => Err(CoreError::Extraction(message.clone())),
            None => Ok(None),
        }
    }
}

pub struct Harness {
    pub bot: TallyBot,
    pub store: Arc<JsonRecordStore>,
    pub transport: RecordingTransport,
    pub home: PathBuf,
}

impl Harness {
    pub fn new(extractor: StubExtractor, config: Config) -> Self {
        let home = temp_home();
        let store = Arc::new(
            JsonRecordStore::new(config.resolve_data_file(&home)).expect("create json store"),
        );
        let bot = TallyBot::with_components(
            store.clone(),
            Arc::new(extractor),
            Arc::new(tally_bot::render::SvgRenderer::new()),
            &config,
            &home,
        );
        Self {
            bot,
            store,
            transport: RecordingTransport::default(),
            home,
        }
    }

    pub fn seed(&self, user: &UserId, lines: &[&str]) {
        for line in lines {
            self.store
                .append(user, tally_domain::RecordKind::Expense, line)
                .expect("seed ledger");
        }
    }

    pub fn say(&mut self, user: &UserId, text: &str) {
        self.bot
            .handle(
                &self.transport,
                tally_core::IncomingMessage::text(user.clone(), text),
            )
            .expect("bot handles text");
    }

    pub fn send(&mut self, message: tally_core::IncomingMessage) {
        self.bot
            .handle(&self.transport, message)
            .expect("bot handles upload");
    }
}

/// Writes a zip archive of `(name, bytes)` members under the test home.
pub fn write_archive(home: &Path, file_name: &str, members: &[(&str, &[u8])]) -> PathBuf {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in members {
        writer
            .start_file(*name, FileOptions::default())
            .expect("start zip member");
        writer.write_all(bytes).expect("write zip member");
    }
    let bytes = writer.finish().expect("finish zip").into_inner();
    let path = home.join(file_name);
    fs::write(&path, bytes).expect("write archive");
    path
}
