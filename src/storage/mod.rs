//! Storage for record collections and their persisted snapshots

pub mod in_memory;
pub mod kv;
pub mod snapshot;

pub use in_memory::RecordStore;
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
pub use snapshot::{
    SeedOptions, SnapshotWrite, encode_records, hydrate, load_records, parse_records, save_records,
    write_snapshots,
};

use crate::config::{StorageConfig, StorageKind};
use crate::core::ConfigError;
use anyhow::Result;
use std::sync::Arc;

/// Open the key-value backend described by `config`
pub async fn open_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.kind {
        StorageKind::Memory => Ok(Arc::new(InMemoryKeyValueStore::new())),
        StorageKind::File => {
            let dir = config.dir.as_ref().ok_or_else(|| {
                ConfigError::Invalid("storage.dir is required for file storage".to_string())
            })?;
            Ok(Arc::new(FileKeyValueStore::open(dir).await?))
        }
    }
}
