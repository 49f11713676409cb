//! Durable key-value storage behind a narrow port.
//!
//! The game core only ever reads and writes whole JSON strings under fixed
//! keys, so the port stays minimal. Implementations must degrade gracefully:
//! a failed read is an absent value, a failed write is a logged no-op.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Storage key for the played-verse ledger
pub const PLAYED_VERSES_KEY: &str = "poroshki_played_verses";

/// Storage key for the in-progress session snapshot
pub const GAME_STATE_KEY: &str = "poroshki_game_state";

/// Trait all storage backends must implement
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Read the value stored under a key, if any
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value under a key, replacing any previous value
    async fn set(&self, key: &str, value: String);

    /// Delete the value stored under a key
    async fn remove(&self, key: &str);
}

/// File-backed storage: one JSON file per key under a data directory
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl StoragePort for FileStorage {
    async fn get(&self, key: &str) -> Option<String> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Some(value),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read storage key {}: {}", key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String) {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            tracing::warn!("Failed to create data dir {}: {}", self.dir.display(), e);
            return;
        }
        if let Err(e) = tokio::fs::write(self.path_for(key), value).await {
            tracing::warn!("Failed to write storage key {}: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        if let Err(e) = tokio::fs::remove_file(self.path_for(key)).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!("Failed to remove storage key {}: {}", key, e);
            }
        }
    }
}

/// In-memory storage for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}
