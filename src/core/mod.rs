//! Core module containing the record model, errors and change events

pub mod error;
pub mod events;
pub mod field;
pub mod record;
pub mod service;

pub use error::{BoardError, BoardResult, ConfigError, EntityError, StorageError, ValidationError};
pub use events::{BoardEvent, ChangeKind, EventBus, EventEnvelope};
pub use field::{FieldFormat, FieldValue, IntoFieldValue};
pub use record::Record;
pub use service::DataService;
