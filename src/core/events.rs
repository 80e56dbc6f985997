//! Change notifications for record collections
//!
//! Views hold a derived listing that is only valid for the record snapshot it
//! was computed from. The board publishes a [`BoardEvent`] after every
//! persisted mutation so a view knows its collection changed and re-derives.
//!
//! ```text
//! JobBoard::post_job ──┐
//! JobBoard::apply    ──┼──▶ EventBus::publish() ──▶ broadcast channel ──▶ listing views
//! JobBoard::delete_* ──┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// What happened to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// A single record mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardEvent {
    /// Collection the record belongs to (e.g., "jobs")
    pub collection: String,
    /// Record identifier
    pub record_id: String,
    pub change: ChangeKind,
}

impl BoardEvent {
    pub fn created(collection: &str, record_id: &str) -> Self {
        Self::new(collection, record_id, ChangeKind::Created)
    }

    pub fn updated(collection: &str, record_id: &str) -> Self {
        Self::new(collection, record_id, ChangeKind::Updated)
    }

    pub fn deleted(collection: &str, record_id: &str) -> Self {
        Self::new(collection, record_id, ChangeKind::Deleted)
    }

    fn new(collection: &str, record_id: &str, change: ChangeKind) -> Self {
        Self {
            collection: collection.to_string(),
            record_id: record_id.to_string(),
            change,
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    pub event: BoardEvent,
}

impl EventEnvelope {
    pub fn new(event: BoardEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; every clone publishes into the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// Receivers that fall more than `capacity` events behind get `Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails; with no subscribers the event is dropped. Returns the
    /// number of receivers that will see it.
    pub fn publish(&self, event: BoardEvent) -> usize {
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    /// Subscribe to future events
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
