//! Durable key-value store backed by a TOML file.

use super::atomic_toml::AtomicTomlFile;
use blackarrow_core::error::Result;
use blackarrow_core::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk layout:
///
/// ```toml
/// [entries]
/// "blackarrow.region" = "UAE"
/// "blackarrow.theme" = "dark"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredEntries {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Durable storage that survives restarts.
///
/// Reads go to disk each time so that several processes sharing the file
/// observe each other's writes. A corrupted file reads as an error (callers
/// treat it as absent) and is replaced on the next write.
pub struct FileStore {
    file: AtomicTomlFile<StoredEntries>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let stored = self.file.load()?.unwrap_or_default();
        Ok(stored.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        tracing::debug!("[FileStore] set {} in {:?}", key, self.path());
        self.file.update(
            StoredEntries::default(),
            Some(StoredEntries::default()),
            |stored| {
                stored.entries.insert(key.to_string(), value.to_string());
            },
        )
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.file.update(
            StoredEntries::default(),
            Some(StoredEntries::default()),
            |stored| {
                stored.entries.remove(key);
            },
        )
    }
}
