//! Collection snapshots: JSON arrays stored under one key per collection
//!
//! Loading is forgiving. A value that is not a JSON array is treated as an
//! empty collection, and elements that cannot be read as a record (or carry
//! no id) are dropped with a warning. Missing fields are filled with defaults
//! by the record's own deserializer.

use super::kv::KeyValueStore;
use crate::core::{Record, StorageError};
use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Read a collection from `key`; absent or unreadable data yields an empty list
pub async fn load_records<T>(kv: &dyn KeyValueStore, key: &str) -> Result<Vec<T>>
where
    T: Record + DeserializeOwned,
{
    let Some(raw) = kv.get_item(key).await? else {
        debug!(key, "No stored snapshot");
        return Ok(Vec::new());
    };

    Ok(parse_records(key, &raw))
}

/// Parse a raw snapshot, skipping elements that do not form a record
pub fn parse_records<T>(key: &str, raw: &str) -> Vec<T>
where
    T: Record + DeserializeOwned,
{
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            warn!(key, kind = json_kind(&other), "Stored snapshot is not an array, ignoring it");
            return Vec::new();
        }
        Err(e) => {
            warn!(key, error = %e, "Stored snapshot is not valid JSON, ignoring it");
            return Vec::new();
        }
    };

    let total = items.len();
    let records: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
            Ok(record) if record.id().is_empty() => {
                warn!(key, index, "Dropping stored record without an id");
                None
            }
            Ok(record) => Some(record),
            Err(e) => {
                warn!(key, index, error = %e, "Dropping unreadable stored record");
                None
            }
        })
        .collect();

    debug!(key, loaded = records.len(), total, "Loaded snapshot");
    records
}

/// Serialize a collection the way it is stored under `key`
pub fn encode_records<T: Serialize>(key: &str, records: &[T]) -> Result<String> {
    serde_json::to_string(records).map_err(|source| {
        StorageError::Serialization {
            key: key.to_string(),
            source,
        }
        .into()
    })
}

/// Write a whole collection under `key`
pub async fn save_records<T>(kv: &dyn KeyValueStore, key: &str, records: &[T]) -> Result<()>
where
    T: Record + Serialize,
{
    kv.set_item(key, encode_records(key, records)?).await?;
    debug!(key, count = records.len(), "Saved snapshot");
    Ok(())
}

/// A collection's stored value before and after one change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotWrite {
    pub key: &'static str,
    pub before: String,
    pub after: String,
}

impl SnapshotWrite {
    pub fn new<T>(before: &[T], after: &[T]) -> Result<Self>
    where
        T: Record + Serialize,
    {
        let key = T::resource_name();
        Ok(Self {
            key,
            before: encode_records(key, before)?,
            after: encode_records(key, after)?,
        })
    }
}

/// Store every write in order
///
/// When one fails, the writes already made are put back to their previous
/// value and the original error is returned.
pub async fn write_snapshots(kv: &dyn KeyValueStore, writes: &[&SnapshotWrite]) -> Result<()> {
    for (index, write) in writes.iter().enumerate() {
        if let Err(error) = kv.set_item(write.key, write.after.clone()).await {
            warn!(
                key = write.key,
                error = %error,
                "Snapshot write failed, restoring earlier writes"
            );
            for done in writes[..index].iter().rev() {
                if let Err(e) = kv.set_item(done.key, done.before.clone()).await {
                    warn!(key = done.key, error = %e, "Could not restore snapshot");
                }
            }
            return Err(error);
        }
        debug!(key = write.key, "Saved snapshot");
    }
    Ok(())
}

/// Whether and how to install default data into empty collections
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedOptions {
    pub enabled: bool,
    /// Simulated latency before the defaults appear
    pub delay: Duration,
}

/// Load a collection, seeding it when nothing is stored under `key`
///
/// A stored empty array is a real, empty collection and is never reseeded.
/// Returns the records and whether they came from the seed. Seeded data is
/// persisted immediately so the next load reads it back.
pub async fn hydrate<T, F>(
    kv: &dyn KeyValueStore,
    key: &str,
    seed: F,
    options: SeedOptions,
) -> Result<(Vec<T>, bool)>
where
    T: Record + Serialize + DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    match kv.get_item(key).await? {
        Some(raw) => return Ok((parse_records(key, &raw), false)),
        None if !options.enabled => {
            debug!(key, "No stored snapshot");
            return Ok((Vec::new(), false));
        }
        None => {}
    }

    if !options.delay.is_zero() {
        tokio::time::sleep(options.delay).await;
    }

    let seeded = seed();
    save_records(kv, key, &seeded).await?;
    info!(key, count = seeded.len(), "Seeded collection");
    Ok((seeded, true))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Application, ApplicationStatus, Job, seed};
    use crate::storage::InMemoryKeyValueStore;
    use async_trait::async_trait;

    /// Accepts every write except those to `failing`
    struct FailingKeyValueStore {
        inner: InMemoryKeyValueStore,
        failing: &'static str,
    }

    #[async_trait]
    impl KeyValueStore for FailingKeyValueStore {
        async fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: String) -> Result<()> {
            if key == self.failing {
                anyhow::bail!("disk full");
            }
            self.inner.set_item(key, value).await
        }

        async fn remove_item(&self, key: &str) -> Result<()> {
            self.inner.remove_item(key).await
        }

        async fn keys(&self) -> Result<Vec<String>> {
            self.inner.keys().await
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_empty() {
        let kv = InMemoryKeyValueStore::new();
        let jobs: Vec<Job> = load_records(&kv, "jobs").await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_non_array_and_garbage_are_empty() {
        let kv = InMemoryKeyValueStore::new();
        kv.set_item("jobs", "{\"id\": 1}".to_string()).await.unwrap();
        assert!(load_records::<Job>(&kv, "jobs").await.unwrap().is_empty());

        kv.set_item("jobs", "not json".to_string()).await.unwrap();
        assert!(load_records::<Job>(&kv, "jobs").await.unwrap().is_empty());
    }

    #[test]
    fn test_bad_elements_are_skipped() {
        let raw = r#"[
            {"id": 1, "title": "Kept"},
            "a string",
            {"title": "No id"},
            {"id": "x2", "title": "Also kept", "visible": "yes"}
        ]"#;
        let jobs: Vec<Job> = parse_records("jobs", raw);
        let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Kept", "Also kept"]);
        assert!(jobs[0].visible);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let kv = InMemoryKeyValueStore::new();
        let jobs = seed::jobs();
        save_records(&kv, "jobs", &jobs).await.unwrap();

        let loaded: Vec<Job> = load_records(&kv, "jobs").await.unwrap();
        assert_eq!(loaded, jobs);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hydrate_seeds_after_delay() {
        let kv = InMemoryKeyValueStore::new();
        let options = SeedOptions {
            enabled: true,
            delay: Duration::from_millis(800),
        };

        let start = tokio::time::Instant::now();
        let (jobs, seeded) = hydrate(&kv, "jobs", seed::jobs, options).await.unwrap();
        assert!(seeded);
        assert_eq!(jobs.len(), seed::jobs().len());
        assert!(start.elapsed() >= Duration::from_millis(800));

        // Second load reads the persisted seed back
        let (again, seeded) = hydrate(&kv, "jobs", Vec::<Job>::new, options).await.unwrap();
        assert!(!seeded);
        assert_eq!(again, jobs);
    }

    #[tokio::test]
    async fn test_hydrate_without_seeding() {
        let kv = InMemoryKeyValueStore::new();
        let (jobs, seeded) = hydrate(&kv, "jobs", seed::jobs, SeedOptions::default())
            .await
            .unwrap();
        assert!(!seeded);
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_null_status_keeps_application() {
        let raw = r#"[{"id": "a1", "job_id": "1", "status": null}, {"id": "a2", "status": 7}]"#;
        let applications: Vec<Application> = parse_records("applications", raw);
        assert_eq!(applications.len(), 2);
        assert!(applications.iter().all(|a| a.status == ApplicationStatus::Pending));
    }

    #[tokio::test]
    async fn test_stored_empty_collection_is_not_reseeded() {
        let kv = InMemoryKeyValueStore::new();
        kv.set_item("jobs", "[]".to_string()).await.unwrap();
        let options = SeedOptions {
            enabled: true,
            delay: Duration::ZERO,
        };

        let (jobs, seeded) = hydrate(&kv, "jobs", seed::jobs, options).await.unwrap();
        assert!(!seeded);
        assert!(jobs.is_empty());
        assert_eq!(kv.get_item("jobs").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_failed_write_restores_earlier_writes() {
        let kv = FailingKeyValueStore {
            inner: InMemoryKeyValueStore::new(),
            failing: "applications",
        };
        kv.set_item("jobs", "[1]".to_string()).await.unwrap();

        let jobs = SnapshotWrite {
            key: "jobs",
            before: "[1]".to_string(),
            after: "[]".to_string(),
        };
        let applications = SnapshotWrite {
            key: "applications",
            before: "[2]".to_string(),
            after: "[]".to_string(),
        };
        let err = write_snapshots(&kv, &[&jobs, &applications]).await.unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert_eq!(kv.get_item("jobs").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(kv.get_item("applications").await.unwrap(), None);
    }

    #[test]
    fn test_snapshot_write_encodes_both_sides() {
        let jobs = seed::jobs();
        let write = SnapshotWrite::new(&jobs, &jobs[..1]).unwrap();
        assert_eq!(write.key, "jobs");
        assert_eq!(parse_records::<Job>("jobs", &write.before), jobs);
        assert_eq!(parse_records::<Job>("jobs", &write.after), jobs[..1].to_vec());
    }
}
