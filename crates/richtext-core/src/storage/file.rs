use std::fs;
use std::path::{Path, PathBuf};

use super::{Storage, StorageError, StorageResult};

/// Stores the document as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates `dir` if it does not exist yet.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> StorageResult<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                StorageError::Io(format!(
                    "Failed to create storage directory {}: {e}",
                    dir.display()
                ))
            })?;
        }
        Ok(Self {
            path: dir.join(format!("{}.json", sanitize_key(key))),
        })
    }

    /// `<data dir>/richtext/`, e.g. `~/.local/share/richtext/` on Linux.
    pub fn default_location(key: &str) -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("richtext"), key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl Storage for FileStorage {
    fn read(&self) -> StorageResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path).map(Some).map_err(|e| {
            StorageError::Io(format!("Failed to read {}: {e}", self.path.display()))
        })
    }

    fn write(&self, contents: &str) -> StorageResult<()> {
        fs::write(&self.path, contents).map_err(|e| {
            StorageError::Io(format!("Failed to write {}: {e}", self.path.display()))
        })
    }

    fn clear(&self) -> StorageResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {e}", self.path.display()))
            })?;
        }
        Ok(())
    }
}
