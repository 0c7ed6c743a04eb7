use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::errors::{Error, Result};

/// Source of raw asset bytes.
pub trait AssetReader: Send + Sync {
    /// Reads the whole asset at `uri`. A missing asset is
    /// [`Error::AssetNotFound`].
    fn read_bytes(&self, uri: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Reads assets from a directory on the local file system.
#[derive(Debug, Clone)]
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            root_path: path.as_ref().to_path_buf(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl AssetReader for FileAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::AssetNotFound(path.display().to_string()))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// In-memory asset table, for embedded assets and tests.
#[derive(Debug, Default)]
pub struct MemoryAssetReader {
    files: RwLock<FxHashMap<String, Arc<Vec<u8>>>>,
}

impl MemoryAssetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(self, uri: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(uri, bytes);
        self
    }

    pub fn insert(&self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.files.write().insert(uri.into(), Arc::new(bytes));
    }

    pub fn remove(&self, uri: &str) -> bool {
        self.files.write().remove(uri).is_some()
    }
}

impl AssetReader for MemoryAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let file = self.files.read().get(uri).cloned();
        file.map(|bytes| bytes.as_ref().clone())
            .ok_or_else(|| Error::AssetNotFound(uri.to_string()))
    }
}

/// Closed set of readers, avoiding trait objects for the async method.
#[derive(Debug, Clone)]
pub enum AssetReaderVariant {
    File(Arc<FileAssetReader>),
    Memory(Arc<MemoryAssetReader>),
}

impl AssetReaderVariant {
    #[must_use]
    pub fn file(root: impl AsRef<Path>) -> Self {
        Self::File(Arc::new(FileAssetReader::new(root)))
    }

    #[must_use]
    pub fn memory(reader: MemoryAssetReader) -> Self {
        Self::Memory(Arc::new(reader))
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        match self {
            Self::File(r) => r.read_bytes(uri).await,
            Self::Memory(r) => r.read_bytes(uri).await,
        }
    }
}
