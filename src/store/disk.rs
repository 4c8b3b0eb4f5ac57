use crate::core::storage::Storage;
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION_NAME: &str = "local";

/// Durable storage on an embedded fjall keyspace. Every write is flushed
/// to disk before returning.
pub struct DiskStorage {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStorage {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create storage directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open storage at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION_NAME, PartitionCreateOptions::default())
            .context("Failed to open storage partition")?;
        debug!("Opened disk storage at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush storage to disk")
    }
}

impl Storage for DiskStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(bytes) = self
            .partition
            .get(key)
            .with_context(|| format!("Failed to read key: {key}"))?
        else {
            debug!("Storage MISS for key: {}", key);
            return Ok(None);
        };

        debug!("Storage HIT for key: {}", key);
        let value = String::from_utf8(bytes.to_vec())
            .with_context(|| format!("Stored value for key {key} is not valid UTF-8"))?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.partition
            .insert(key.as_bytes(), value.as_bytes())
            .with_context(|| format!("Failed to write key: {key}"))?;
        debug!("Storage SET for key: {}", key);
        self.persist()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.partition
            .remove(key.as_bytes())
            .with_context(|| format!("Failed to remove key: {key}"))?;
        debug!("Storage REMOVE for key: {}", key);
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_disk_storage_get_set_remove() {
        let dir = tempdir().unwrap();
        let storage = DiskStorage::open(dir.path()).unwrap();

        assert!(storage.get("auth_token").unwrap().is_none());

        storage.set("auth_token", "abc").unwrap();
        assert_eq!(storage.get("auth_token").unwrap().as_deref(), Some("abc"));

        storage.remove("auth_token").unwrap();
        assert!(storage.get("auth_token").unwrap().is_none());
    }

    #[test]
    fn test_disk_storage_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let storage = DiskStorage::open(dir.path()).unwrap();
            storage.set("user", r#"{"id":"1"}"#).unwrap();
        }

        let storage = DiskStorage::open(dir.path()).unwrap();
        assert_eq!(
            storage.get("user").unwrap().as_deref(),
            Some(r#"{"id":"1"}"#)
        );
    }
}
