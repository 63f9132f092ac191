//! tally-storage-json
//!
//! Flat-file persistence for user ledgers: one JSON document keyed by user id.
//! Each user entry is an object whose `data` / `income_data` arrays hold raw
//! ledger lines; any other fields in the entry are preserved untouched.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde_json::{json, Map, Value};
use tally_core::{storage::RecordStore, CoreError};
use tally_domain::{RecordKind, UserId};
use tracing::{debug, warn};

const TMP_SUFFIX: &str = "tmp";

pub type StoreDocument = Map<String, Value>;

/// JSON document store implementing [`RecordStore`].
///
/// Appends inside one process are serialised; separate processes writing the
/// same file are not coordinated.
#[derive(Debug)]
pub struct JsonRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new(path: PathBuf) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<StoreDocument, CoreError> {
        load_document_from_path(&self.path)
    }
}

impl RecordStore for JsonRecordStore {
    fn read_all(&self, user: &UserId, kind: RecordKind) -> Result<Vec<String>, CoreError> {
        let document = self.load()?;
        let Some(list) = document
            .get(user.as_str())
            .and_then(|entry| entry.get(kind.ledger_field()))
            .and_then(Value::as_array)
        else {
            return Ok(Vec::new());
        };

        let mut lines = Vec::with_capacity(list.len());
        for value in list {
            match value.as_str() {
                Some(line) => lines.push(line.to_string()),
                None => warn!(user = %user, value = %value, "ignoring non-text ledger value"),
            }
        }
        Ok(lines)
    }

    fn append(&self, user: &UserId, kind: RecordKind, line: &str) -> Result<(), CoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CoreError::Storage("store write lock poisoned".into()))?;

        let mut document = self.load()?;
        let entry = document
            .entry(user.as_str().to_string())
            .or_insert_with(new_user_entry);
        let entry = entry.as_object_mut().ok_or_else(|| {
            CoreError::Storage(format!("store entry for user `{}` is not an object", user))
        })?;
        let list = entry
            .entry(kind.ledger_field().to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let list = list.as_array_mut().ok_or_else(|| {
            CoreError::Storage(format!(
                "`{}` for user `{}` is not a list",
                kind.ledger_field(),
                user
            ))
        })?;
        list.push(Value::String(line.to_string()));

        save_document_to_path(&document, &self.path)?;
        debug!(user = %user, kind = %kind, "ledger line appended");
        Ok(())
    }
}

fn new_user_entry() -> Value {
    let mut entry = json!({});
    for kind in RecordKind::ALL {
        entry[kind.ledger_field()] = Value::Array(Vec::new());
    }
    entry
}

/// Loads the store document; a missing or blank file is an empty store.
pub fn load_document_from_path(path: &Path) -> Result<StoreDocument, CoreError> {
    if !path.exists() {
        return Ok(StoreDocument::new());
    }
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(StoreDocument::new());
    }
    match serde_json::from_str::<Value>(&data).map_err(|err| CoreError::Serde(err.to_string()))? {
        Value::Object(map) => Ok(map),
        _ => Err(CoreError::Storage(format!(
            "store document {} is not a JSON object",
            path.display()
        ))),
    }
}

/// Writes the whole document through a temporary file and renames it into place.
pub fn save_document_to_path(document: &StoreDocument, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json =
        serde_json::to_string_pretty(document).map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
