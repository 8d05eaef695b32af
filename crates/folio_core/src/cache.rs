//! Local mirror of the last-known document.
//!
//! # Responsibility
//! - Keep a device-local copy of the document for when the backend fails.
//!
//! # Invariants
//! - Cache failures never propagate: a corrupt cache reads as empty and a
//!   failed write is only logged.

use crate::model::document::PortfolioDocument;
use log::{error, warn};
use serde_json::Value;
use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Cache key, also used as the file stem.
pub const CACHE_KEY: &str = "portfolio_data";

/// Storage contract for the local document mirror.
pub trait ContentCache {
    /// Returns the cached raw document, if readable.
    fn load(&self) -> Option<Value>;
    /// Replaces the cached document.
    fn store(&self, document: &PortfolioDocument);
}

/// JSON file cache under a directory.
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{CACHE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentCache for FileCache {
    fn load(&self) -> Option<Value> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                error!(
                    "event=cache_load module=cache status=error error_code=read_failed error={}",
                    err
                );
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(
                    "event=cache_load module=cache status=error error_code=corrupt_cache error={}",
                    err
                );
                None
            }
        }
    }

    fn store(&self, document: &PortfolioDocument) {
        let text = match serde_json::to_string(document) {
            Ok(text) => text,
            Err(err) => {
                error!(
                    "event=cache_store module=cache status=error error_code=encode_failed error={}",
                    err
                );
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!(
                    "event=cache_store module=cache status=skipped error_code=dir_failed error={}",
                    err
                );
                return;
            }
        }

        // Readers never observe a half-written file.
        let staging = self.path.with_extension("json.tmp");
        let result =
            std::fs::write(&staging, text).and_then(|()| std::fs::rename(&staging, &self.path));
        if let Err(err) = result {
            warn!(
                "event=cache_store module=cache status=skipped error_code=write_failed error={}",
                err
            );
        }
    }
}

/// Process-local cache for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryCache {
    value: RefCell<Option<Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cache with an arbitrary raw value.
    pub fn with_value(value: Value) -> Self {
        Self {
            value: RefCell::new(Some(value)),
        }
    }
}

impl ContentCache for MemoryCache {
    fn load(&self) -> Option<Value> {
        self.value.borrow().clone()
    }

    fn store(&self, document: &PortfolioDocument) {
        match serde_json::to_value(document) {
            Ok(value) => *self.value.borrow_mut() = Some(value),
            Err(err) => warn!(
                "event=cache_store module=cache status=skipped error_code=encode_failed error={}",
                err
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentCache, FileCache, MemoryCache};
    use crate::model::defaults::initial_document;

    #[test]
    fn file_cache_round_trips_document() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        assert!(cache.load().is_none());

        let mut doc = initial_document();
        doc.profile.name = "Cached".to_string();
        cache.store(&doc);

        let loaded = cache.load().unwrap();
        assert_eq!(loaded["profile"]["name"], "Cached");
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        std::fs::write(cache.path(), "{not json").unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn memory_cache_keeps_last_store() {
        let cache = MemoryCache::new();
        cache.store(&initial_document());
        assert!(cache.load().unwrap()["albums"].is_array());
    }
}
