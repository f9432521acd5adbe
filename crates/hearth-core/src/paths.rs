//! File system paths for the client.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Cache file name under the base directory.
const CACHE_FILE_NAME: &str = "cache.json";

/// Manages file system paths for the client.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for client files (~/.hearth)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.hearth`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".hearth"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.hearth).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.hearth/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the persistent cache file path (~/.hearth/cache.json).
    pub fn cache_file(&self) -> PathBuf {
        self.base_dir.join(CACHE_FILE_NAME)
    }

    /// Get the logs directory (~/.hearth/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().expect("Failed to determine home directory")
    }
}
