//! Persistence backends for the library document

use super::document::LibraryDocument;
use crate::error::StoreError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Result type for backend operations
pub type BackendResult<T> = std::result::Result<T, StoreError>;

/// Where the library document lives
#[async_trait]
pub trait Backend: Send + Sync {
    /// Load the stored document, `None` if nothing has been saved yet
    async fn load(&self) -> BackendResult<Option<LibraryDocument>>;

    /// Replace the stored document
    async fn save(&self, document: &LibraryDocument) -> BackendResult<()>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// JSON file on the local filesystem
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Backend for FileBackend {
    async fn load(&self) -> BackendResult<Option<LibraryDocument>> {
        // Read file directly, handle NotFound as empty library
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => LibraryDocument::from_json(&data).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temp file then renames to avoid partial writes
    async fn save(&self, document: &LibraryDocument) -> BackendResult<()> {
        let data = document.to_json()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Temp file in same directory keeps the rename on one filesystem
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &data).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory backend (for testing)
///
/// Keeps the serialized JSON so documents go through the same
/// encode/migrate path as files. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<Option<String>>>,
    saves: Arc<AtomicUsize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing JSON document
    pub fn with_json(json: impl Into<String>) -> Self {
        let backend = Self::new();
        *backend.data.write().unwrap_or_else(|e| e.into_inner()) = Some(json.into());
        backend
    }

    /// Number of completed saves
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The last saved JSON
    pub fn contents(&self) -> Option<String> {
        self.data.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn load(&self) -> BackendResult<Option<LibraryDocument>> {
        self.contents()
            .map(|json| LibraryDocument::from_json(&json))
            .transpose()
    }

    async fn save(&self, document: &LibraryDocument) -> BackendResult<()> {
        let json = document.to_json()?;
        *self.data.write().unwrap_or_else(|e| e.into_inner()) = Some(json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
