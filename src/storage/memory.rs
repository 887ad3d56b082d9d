use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StorageError;

use super::Storage;

/// In-memory storage for tests; counts writes so tests can assert on flushes
#[derive(Debug, Default, Clone)]
pub(crate) struct MemoryStorage {
    values: HashMap<String, String>,
    pub(crate) writes: usize,
    /// Writes to this key fail with an I/O error
    pub(crate) fail_on: Option<&'static str>,
}

impl MemoryStorage {
    pub(crate) fn with(entries: &[(&str, &str)]) -> Self {
        Self {
            values: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            writes: 0,
            fail_on: None,
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_on == Some(key) {
            return Err(StorageError::Io {
                path: PathBuf::from(key),
                source: std::io::Error::other("disk full"),
            });
        }
        self.writes += 1;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.writes += 1;
        self.values.remove(key);
        Ok(())
    }
}
