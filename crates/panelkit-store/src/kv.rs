//! Key/value store abstraction
//!
//! The extension-scoped storage of the original frontend becomes an injected
//! trait here: callers hold an `Arc<dyn KeyValueStore>` and never touch
//! ambient global state. Two implementations are provided, a JSON file
//! backed store and an in-memory store for tests.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Injected key/value storage seam
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Write `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;

    /// Delete the value stored under `key`; removing an absent key is a no-op
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-memory store for tests and callers without a filesystem
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// JSON file backed store
///
/// The whole map is loaded on open and written through on every mutation,
/// so a crash never loses more than the in-flight write.
pub struct FileStore {
    entries: RwLock<HashMap<String, Value>>,
    path: PathBuf,
}

impl FileStore {
    /// Open a store at `path`, loading existing state if the file exists
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let entries = if fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))?
        {
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| StoreError::io(&path, e))?;
            let entries: HashMap<String, Value> = serde_json::from_str(&content)?;
            debug!("Loaded {} entries from {}", entries.len(), path.display());
            entries
        } else {
            HashMap::new()
        };

        Ok(Self {
            entries: RwLock::new(entries),
            path,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn persist(&self, entries: &HashMap<String, Value>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        // The write lock is held across the file write so concurrent
        // mutations cannot interleave a stale snapshot.
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        self.persist(&entries).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}
