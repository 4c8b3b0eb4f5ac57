pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::storage::Storage;
use anyhow::Result;
use disk::DiskStorage;
use std::sync::Arc;

/// Opens the durable store under the configured data directory.
pub fn open(config: &AppConfig) -> Result<Arc<dyn Storage>> {
    let path = config.default_data_path()?.join("storage");
    Ok(Arc::new(DiskStorage::open(&path)?))
}
