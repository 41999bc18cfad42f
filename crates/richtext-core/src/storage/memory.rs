use std::sync::RwLock;

use super::{Storage, StorageError, StorageResult};

/// In-memory slot for tests and sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: RwLock<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: RwLock::new(Some(contents.into())),
        }
    }

    /// Snapshot of the slot.
    pub fn contents(&self) -> Option<String> {
        self.read().ok().flatten()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> StorageResult<Option<String>> {
        let contents = self
            .contents
            .read()
            .map_err(|e| StorageError::Io(format!("Lock error: {e}")))?;
        Ok(contents.clone())
    }

    fn write(&self, contents: &str) -> StorageResult<()> {
        let mut slot = self
            .contents
            .write()
            .map_err(|e| StorageError::Io(format!("Lock error: {e}")))?;
        *slot = Some(contents.to_string());
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut slot = self
            .contents
            .write()
            .map_err(|e| StorageError::Io(format!("Lock error: {e}")))?;
        *slot = None;
        Ok(())
    }
}
