use crate::core::storage::Storage;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory storage backed by a HashMap. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .inner
            .read()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        let value = map.get(key).cloned();
        if value.is_some() {
            debug!("Storage HIT for key: {}", key);
        } else {
            debug!("Storage MISS for key: {}", key);
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        debug!("Storage SET for key: {}", key);
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        debug!("Storage REMOVE for key: {}", key);
        map.remove(key);
        Ok(())
    }
}
