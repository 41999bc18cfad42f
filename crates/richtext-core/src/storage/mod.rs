//! Persistence of the document under a single key.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use log::{debug, warn};
use thiserror::Error;

use crate::document::Document;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A single string slot. Writes replace the previous contents.
pub trait Storage {
    /// The stored contents, or `None` if nothing is stored.
    fn read(&self) -> StorageResult<Option<String>>;

    fn write(&self, contents: &str) -> StorageResult<()>;

    /// Removes the stored contents. Clearing an empty slot is not an error.
    fn clear(&self) -> StorageResult<()>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read(&self) -> StorageResult<Option<String>> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> StorageResult<()> {
        (**self).write(contents)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }
}

/// Loads the stored document. Missing, unreadable or undecodable contents
/// fall back to `fallback()`.
pub fn load_document(storage: &dyn Storage, fallback: impl FnOnce() -> Document) -> Document {
    let contents = match storage.read() {
        Ok(Some(contents)) => contents,
        Ok(None) => {
            debug!("no saved document, using default");
            return fallback();
        }
        Err(err) => {
            warn!("failed to read saved document, using default: {err}");
            return fallback();
        }
    };

    match Document::from_json(&contents) {
        Ok(doc) => doc,
        Err(err) => {
            warn!("saved document is not valid, using default: {err}");
            fallback()
        }
    }
}

pub fn save_document(storage: &dyn Storage, doc: &Document) -> StorageResult<()> {
    let json = doc.to_json()?;
    storage.write(&json)
}
