//! File-backed key-value storage
//!
//! Every key lives in a single JSON object at `<data dir>/storage.json`, so the CLI sees the same
//! records a browser profile would hold in local storage.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use storefront::storage::{KeyValueStore, StorageError};
use tracing::warn;

/// File name of the storage document inside the data directory.
pub const STORAGE_FILE: &str = "storage.json";

type Entries = BTreeMap<String, String>;

/// Key-value store persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store kept in `data_dir`. Nothing is created until the first write.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STORAGE_FILE),
        }
    }

    /// Path of the storage document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(error) => Err(error.into()),
        }
    }

    /// Entries to modify: a corrupt document is replaced rather than blocking every write.
    fn entries_for_update(&self) -> Result<Entries, StorageError> {
        match self.read_entries() {
            Err(StorageError::Json(error)) => {
                warn!(path = %self.path.display(), %error, "replacing corrupt storage file");
                Ok(Entries::new())
            }
            result => result,
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_update()?;
        entries.insert(key.to_string(), value.to_string());

        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_update()?;

        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }

        Ok(())
    }
}
