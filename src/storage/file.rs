//! JSON-file storage
//!
//! All keys live in a single `storage.json` map inside the data directory.
//! The file is read once at open and rewritten on every mutation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::StorageError;

use super::Storage;

const STORAGE_VERSION: u32 = 1;
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    values: BTreeMap<String, String>,
}

#[derive(Debug)]
pub(crate) struct FileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file under `dir`
    pub(crate) fn open(dir: &Path) -> Self {
        let path = dir.join(STORAGE_FILE);
        let values = Self::load(&path);
        Self { path, values }
    }

    fn load(path: &Path) -> BTreeMap<String, String> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(_) => return BTreeMap::new(),
        };
        match serde_json::from_reader::<_, StorageFile>(file) {
            Ok(stored) if stored.version == STORAGE_VERSION => stored.values,
            Ok(stored) => {
                tracing::warn!(
                    path = %path.display(),
                    version = stored.version,
                    "ignoring storage written by an unknown version"
                );
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "storage file is corrupt, starting fresh");
                BTreeMap::new()
            }
        }
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let snapshot = StorageFile {
            version: STORAGE_VERSION,
            values: self.values.clone(),
        };
        let tmp = self.path.with_extension("json.tmp");
        let file = File::create(&tmp).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(file, &snapshot)?;
        fs::rename(&tmp, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), keys = self.values.len(), "storage flushed");
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
