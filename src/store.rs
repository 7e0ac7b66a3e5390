// src/store.rs
use std::{
    path::Path as FsPath,
    sync::{Arc, Mutex},
};

use object_store::{
    ObjectStore, PutPayload, aws::AmazonS3Builder, local::LocalFileSystem, path::Path,
};
use tokio::runtime::Runtime;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage write failed for {key}: {message}")]
    StorageWriteFailed { key: String, message: String },

    #[error("Storage target could not be opened: {0}")]
    Open(String),
}

/// Durable key/value sink for fetched payloads.
/// `put` always replaces the whole object at `key`.
pub trait StorageWriter: Send + Sync {
    fn put(&self, key: &str, body: &[u8]) -> Result<(), StorageError>;

    /// Human-readable target, for logs and the run summary.
    fn describe(&self) -> String;
}

/// Writes through any `object_store` backend from synchronous code.
pub struct ObjectStoreWriter {
    store: Arc<dyn ObjectStore>,
    target: String,
    rt: Runtime,
}

impl ObjectStoreWriter {
    /// S3 bucket; credentials and region come from the usual `AWS_*` variables.
    pub fn s3(bucket: &str) -> Result<Self, StorageError> {
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| StorageError::Open(e.to_string()))?;
        Self::new(Arc::new(store), format!("s3://{bucket}"))
    }

    /// Local directory laid out exactly like the bucket would be.
    pub fn local(dir: &FsPath) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir).map_err(|e| StorageError::Open(e.to_string()))?;
        let store =
            LocalFileSystem::new_with_prefix(dir).map_err(|e| StorageError::Open(e.to_string()))?;
        Self::new(Arc::new(store), format!("file://{}", dir.display()))
    }

    pub fn new(store: Arc<dyn ObjectStore>, target: String) -> Result<Self, StorageError> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("nfl-sync-store")
            .enable_all()
            .build()
            .map_err(|e| StorageError::Open(e.to_string()))?;
        Ok(Self { store, target, rt })
    }
}

impl StorageWriter for ObjectStoreWriter {
    fn put(&self, key: &str, body: &[u8]) -> Result<(), StorageError> {
        let fail = |message: String| StorageError::StorageWriteFailed {
            key: key.to_string(),
            message,
        };
        let path = Path::parse(key).map_err(|e| fail(e.to_string()))?;
        let payload = PutPayload::from(body.to_vec());

        self.rt
            .block_on(self.store.put(&path, payload))
            .map_err(|e| fail(e.to_string()))?;

        logf!("Stored {} bytes at {}/{}", body.len(), self.target, key);
        Ok(())
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}

/// In-memory sink that keeps every write, in order.
#[derive(Default)]
pub struct MemoryStore {
    writes: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every put so far, oldest first.
    pub fn writes(&self) -> Vec<(String, Vec<u8>)> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.writes().into_iter().map(|(k, _)| k).collect()
    }

    /// Latest body stored at `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.writes()
            .into_iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, b)| b)
    }
}

impl StorageWriter for MemoryStore {
    fn put(&self, key: &str, body: &[u8]) -> Result<(), StorageError> {
        let mut w = self.writes.lock().map_err(|e| StorageError::StorageWriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        w.push((key.to_string(), body.to_vec()));
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
