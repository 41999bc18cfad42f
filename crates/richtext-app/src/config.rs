use std::path::PathBuf;

use anyhow::{Context as _, Result};
use richtext_core::{FileStorage, SessionConfig};

pub const DEFAULT_STORAGE_KEY: &str = "content";

/// Settings read from the environment:
///
/// - `RICHTEXT_DIR`: directory holding the saved document
///   (default: the platform data dir)
/// - `RICHTEXT_KEY`: storage key, i.e. the file name without `.json`
/// - `RICHTEXT_DEFAULT_TEXT`: text of a fresh document
/// - `RICHTEXT_NORMALIZE`: `1` to merge equal text runs after each edit
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub storage_dir: Option<PathBuf>,
    pub storage_key: String,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let session = SessionConfig {
            default_text: var("RICHTEXT_DEFAULT_TEXT").unwrap_or_default(),
            normalize_text_runs: matches!(
                var("RICHTEXT_NORMALIZE").as_deref(),
                Some("1" | "true" | "yes")
            ),
        };
        Self {
            storage_dir: var("RICHTEXT_DIR")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            storage_key: var("RICHTEXT_KEY")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            session: session.with_defaults(),
        }
    }

    pub fn open_storage(&self) -> Result<FileStorage> {
        match &self.storage_dir {
            Some(dir) => FileStorage::new(dir, &self.storage_key)
                .with_context(|| format!("opening storage in {}", dir.display())),
            None => FileStorage::default_location(&self.storage_key)
                .context("opening storage in the default location"),
        }
    }
}
