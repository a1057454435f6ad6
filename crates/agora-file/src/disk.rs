//! On-disk layout and primitive file operations.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde_json::{Map, Value};
use tracing::warn;

use agora_core::error::{Error, InvalidInputError};
use agora_core::repo::RawDocument;
use agora_core::{Collection, RecordId, Result};

/// Longest id whose record file name fits a 255-byte name limit.
const MAX_ID_LEN: usize = 250;

/// Directory of per-collection record files.
#[derive(Debug, Clone)]
pub(crate) struct Disk {
    root: PathBuf,
}

/// Held while writing; released on drop.
pub(crate) struct WriteLock {
    file: File,
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(error = %e, "Failed to release store lock");
        }
    }
}

impl Disk {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.root.join("collections").join(collection.as_str())
    }

    fn record_path(&self, collection: Collection, id: &RecordId) -> Result<PathBuf> {
        if id.as_str().len() > MAX_ID_LEN {
            return Err(InvalidInputError::RecordId {
                value: id.to_string(),
                reason: format!("file store ids are limited to {} bytes", MAX_ID_LEN),
            }
            .into());
        }
        Ok(self
            .collection_dir(collection)
            .join(format!("{}.json", id.as_str())))
    }

    /// Take the store-wide exclusive write lock, blocking until available.
    pub fn lock(&self) -> Result<WriteLock> {
        fs::create_dir_all(&self.root)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.root.join("store.lock"))?;
        file.lock_exclusive()?;
        Ok(WriteLock { file })
    }

    /// Read one record, or `None` if it does not exist.
    pub fn read(&self, collection: Collection, id: &RecordId) -> Result<Option<RawDocument>> {
        let content = match fs::read_to_string(self.record_path(collection, id)?) {
            Ok(content) => content,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let fields = parse_fields(collection, id, &content)?;
        Ok(Some(RawDocument::new(id.clone(), fields)))
    }

    /// Write a record atomically (temp file, then rename).
    pub fn write(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: &Map<String, Value>,
    ) -> Result<()> {
        let path = self.record_path(collection, id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(fields)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    /// Remove a record. Returns false if it was already absent.
    pub fn remove(&self, collection: Collection, id: &RecordId) -> Result<bool> {
        match fs::remove_file(self.record_path(collection, id)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Read every record of a collection. Unreadable files are skipped.
    pub fn scan(&self, collection: Collection) -> Result<Vec<RawDocument>> {
        let dir = self.collection_dir(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| RecordId::new(s).ok())
            else {
                continue;
            };

            match self.read(collection, &id) {
                Ok(Some(doc)) => documents.push(doc),
                Ok(None) => {}
                Err(e) => warn!(%collection, %id, error = %e, "Skipping unreadable record"),
            }
        }
        Ok(documents)
    }
}

fn parse_fields(collection: Collection, id: &RecordId, content: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(content) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(schema_error(collection, id, "not a JSON object".to_string())),
        Err(e) => Err(schema_error(collection, id, e.to_string())),
    }
}

fn schema_error(collection: Collection, id: &RecordId, reason: String) -> Error {
    InvalidInputError::Schema {
        collection,
        reason: format!("record {}: {}", id, reason),
    }
    .into()
}
