//! Service trait for record collections

use crate::core::record::Record;
use anyhow::Result;
use async_trait::async_trait;

/// Service trait for managing one record collection
///
/// Implementations provide CRUD operations for a specific record type.
/// The listing engine never goes through this trait: it reads a snapshot
/// taken from `list()` and returns a fresh view.
#[async_trait]
pub trait DataService<T: Record>: Send + Sync {
    /// Append a new record; fails if the id is already taken
    async fn create(&self, record: T) -> Result<T>;

    /// Get a record by id
    async fn get(&self, id: &str) -> Result<Option<T>>;

    /// List all records in insertion order
    async fn list(&self) -> Result<Vec<T>>;

    /// Replace an existing record in place, keeping its position
    async fn update(&self, id: &str, record: T) -> Result<T>;

    /// Delete a record, returning it if it existed
    async fn delete(&self, id: &str) -> Result<Option<T>>;

    /// Records whose field matches `value` case-insensitively
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>>;
}
