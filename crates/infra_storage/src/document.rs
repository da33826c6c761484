//! Document store for full claim and result JSON
//!
//! Keys are relative slash-separated paths such as `claims/<id>.json`.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{HealthCheckResult, HealthCheckable};

use crate::error::StorageError;

/// Blob storage keyed by relative path
#[async_trait]
pub trait DocumentStore: HealthCheckable + Send + Sync {
    /// Writes a document, replacing any existing one
    async fn put(&self, key: &str, body: &[u8]) -> Result<(), StorageError>;

    /// Reads a document; `None` when absent
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Removes a document; returns whether it existed
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}

/// Rejects empty, absolute or parent-relative keys
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("empty key".to_string()));
    }
    let path = Path::new(key);
    let normal = path
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !normal {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Documents as files under a root directory
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Creates the store, creating `root` if needed
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StorageError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl HealthCheckable for FsDocumentStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = tokio::fs::metadata(&self.root).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(meta) if meta.is_dir() => HealthCheckResult::healthy("fs-document-store", latency_ms),
            Ok(_) => HealthCheckResult::unhealthy(
                "fs-document-store",
                latency_ms,
                "document root is not a directory",
            ),
            Err(e) => HealthCheckResult::unhealthy(
                "fs-document-store",
                latency_ms,
                format!("document root unavailable: {e}"),
            ),
        }
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn put(&self, key: &str, body: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        // Readers never observe a partial document
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| StorageError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::io(&path, e))?;

        debug!(key, bytes = body.len(), "Document written");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}

/// Documents held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl HealthCheckable for InMemoryDocumentStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("memory-document-store", 0)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn put(&self, key: &str, body: &[u8]) -> Result<(), StorageError> {
        validate_key(key)?;
        self.documents
            .write()
            .await
            .insert(key.to_string(), body.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        Ok(self.documents.write().await.remove(key).is_some())
    }
}
