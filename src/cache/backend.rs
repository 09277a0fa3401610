// Key-value persistence backends for the star cache.
// Provides an in-memory map and a filesystem store with atomic writes.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::paths::entry_path;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed cache entry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Port for the key-value store behind the star cache.
///
/// Values are opaque strings; callers own their encoding.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), CacheError>;
}

/// Process-local backend. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: DashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Filesystem backend storing one JSON file per key under a namespace directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl CacheBackend for FileBackend {
    async fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = entry_path(&self.root, key);
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.root).await?;

        // Write atomically via a temp file unique to this writer
        let path = entry_path(&self.root, key);
        let temp_path = path.with_extension(format!("{:016x}.tmp", rand::random::<u64>()));

        let written = write_file(&temp_path, value).await;
        let result = match written {
            Ok(()) => fs::rename(&temp_path, &path).await,
            Err(e) => Err(e),
        };

        if result.is_err() {
            let _ = fs::remove_file(&temp_path).await;
        }
        result?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(entry_path(&self.root, key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

async fn write_file(path: &Path, value: &str) -> io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(value.as_bytes()).await?;
    file.sync_all().await
}
