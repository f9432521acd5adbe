//! File-backed key-value storage.
//!
//! All keys live in a single JSON object persisted to one file. Every write
//! rewrites the whole file through a temp-file-then-rename, so a crash mid
//! write leaves either the old or the new state, never a torn file.

use crate::{KeyValueStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// JSON-file-backed storage implementation.
pub struct FileStorage {
    path: PathBuf,
    data: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or create) the storage file at the given path.
    ///
    /// An unreadable or corrupt file is treated as empty rather than fatal:
    /// the cache is advisory and will be repopulated from the server.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cache file corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };

        debug!(path = %path.display(), entries = data.len(), "Opened cache file");

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Write the current map to disk atomically (temp file + rename).
    fn persist(&self, data: &HashMap<String, String>) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(data)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut data = self.data.lock().unwrap();
        data.insert(key.to_string(), value.to_string());
        self.persist(&data)
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let data = self.data.lock().unwrap();
        Ok(data.get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let mut data = self.data.lock().unwrap();
        let existed = data.remove(key).is_some();
        if existed {
            self.persist(&data)?;
        }
        Ok(existed)
    }
}
