//! Where the library lives on disk

use crate::error::StoreError;
use crate::store::{FileBackend, Store};
use std::path::{Path, PathBuf};

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "BOOKSHELF_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "./bookshelf_data";
const LIBRARY_FILE: &str = "library.json";

/// Storage location settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Read `BOOKSHELF_DATA_DIR`, defaulting to `./bookshelf_data`
    pub fn from_env() -> Self {
        let data_dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        Self::new(data_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path to the library document
    pub fn library_path(&self) -> PathBuf {
        self.data_dir.join(LIBRARY_FILE)
    }

    /// Create the data directory and load the library
    pub async fn open_store(&self) -> Result<Store, StoreError> {
        tokio::fs::create_dir_all(&self.data_dir).await.map_err(|e| {
            StoreError::Unavailable(format!("{}: {}", self.data_dir.display(), e))
        })?;
        Store::open(FileBackend::new(self.library_path())).await
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}
