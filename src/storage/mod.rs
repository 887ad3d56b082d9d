//! Durable key/value storage for chat state
//!
//! The chat core never touches the filesystem directly: every component
//! receives a `Storage` and reads/writes string values under the keys in
//! `consts::keys`. Values that hold structured data are JSON-encoded.

mod file;
#[cfg(test)]
mod memory;

use crate::error::StorageError;

pub(crate) use file::FileStorage;
#[cfg(test)]
pub(crate) use memory::MemoryStorage;

/// Process-wide persistence seam, loaded at startup and flushed on mutation
pub(crate) trait Storage {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
