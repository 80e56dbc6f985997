//! Ordered in-memory record collection
//!
//! Records keep their insertion order, which is the order the listing engine
//! sees before sorting and therefore the tiebreak for equal sort keys.

use crate::core::{DataService, EntityError, Record, StorageError};
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

/// In-memory store for one record collection
///
/// Uses RwLock for thread-safe access; clones share the same collection.
#[derive(Clone)]
pub struct RecordStore<T: Record> {
    records: Arc<RwLock<IndexMap<String, T>>>,
}

impl<T: Record> RecordStore<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Build a store from loaded records; the first record wins on duplicate ids
    pub fn from_records(records: impl IntoIterator<Item = T>) -> Self {
        Self {
            records: Arc::new(RwLock::new(index_records(records))),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IndexMap<String, T>>> {
        self.records.read().map_err(|e| {
            StorageError::LockPoisoned(format!("{}: {}", T::resource_name(), e)).into()
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IndexMap<String, T>>> {
        self.records.write().map_err(|e| {
            StorageError::LockPoisoned(format!("{}: {}", T::resource_name(), e)).into()
        })
    }

    /// Point-in-time copy of the collection, in insertion order
    pub fn snapshot(&self) -> Result<Vec<T>> {
        Ok(self.read()?.values().cloned().collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    pub fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.read()?.contains_key(id))
    }

    /// Swap the whole collection
    pub fn replace_all(&self, records: impl IntoIterator<Item = T>) -> Result<()> {
        let indexed = index_records(records);
        *self.write()? = indexed;
        Ok(())
    }

    /// First record matching `predicate`
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Result<Option<T>> {
        Ok(self.read()?.values().find(|r| predicate(r)).cloned())
    }

    /// All records matching `predicate`
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Result<Vec<T>> {
        Ok(self.read()?.values().filter(|r| predicate(r)).cloned().collect())
    }

    /// Run `change` against a copy of the collection; the store is left as is
    ///
    /// Returns the changed records, in order, alongside `change`'s result.
    /// Hand them to [`RecordStore::replace_all`] once the change may be seen.
    pub fn staged<R>(
        &self,
        change: impl FnOnce(&mut IndexMap<String, T>) -> R,
    ) -> Result<(Vec<T>, R)> {
        let mut copy = self.read()?.clone();
        let outcome = change(&mut copy);
        Ok((copy.into_values().collect(), outcome))
    }
}

impl<T: Record> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn index_records<T: Record>(records: impl IntoIterator<Item = T>) -> IndexMap<String, T> {
    let mut indexed = IndexMap::new();
    for record in records {
        let id = record.id().to_string();
        if indexed.contains_key(&id) {
            warn!(
                collection = T::resource_name(),
                id = %id,
                "Duplicate record id, keeping the first"
            );
            continue;
        }
        indexed.insert(id, record);
    }
    indexed
}

#[async_trait]
impl<T: Record> DataService<T> for RecordStore<T> {
    async fn create(&self, record: T) -> Result<T> {
        let mut records = self.write()?;

        if records.contains_key(record.id()) {
            return Err(EntityError::AlreadyExists {
                entity_type: T::resource_name().to_string(),
                key: "id".to_string(),
                value: record.id().to_string(),
            }
            .into());
        }

        records.insert(record.id().to_string(), record.clone());

        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        self.snapshot()
    }

    async fn update(&self, id: &str, record: T) -> Result<T> {
        let mut records = self.write()?;

        let slot = records
            .get_mut(id)
            .ok_or_else(|| EntityError::not_found(T::resource_name(), id))?;
        *slot = record.clone();

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<Option<T>> {
        Ok(self.write()?.shift_remove(id))
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let needle = value.to_lowercase();
        let records = self.read()?;

        Ok(records
            .values()
            .filter(|record| {
                record
                    .field_value(field)
                    .is_some_and(|v| v.search_text() == needle)
            })
            .cloned()
            .collect())
    }
}
