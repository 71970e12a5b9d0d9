use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Durable string key-value storage for client-side state.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Keeps every entry in one JSON object on disk.
pub struct FileStorage {
    path: PathBuf,
    // Serialises read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    warn!("Storage file {} is unreadable, starting empty: {}", self.path.display(), e);
                    Ok(BTreeMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, contents)
            .await
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.to_string());
        debug!("Persisting key {} to {}", key, self.path.display());
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
