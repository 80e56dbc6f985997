//! Typed error handling for the job board
//!
//! The listing engine is total over its inputs and never fails; errors only
//! come from board mutations, persistence and configuration.
//!
//! # Error Categories
//!
//! - [`EntityError`]: a record is missing, duplicated, or the action is refused
//! - [`ValidationError`]: a draft failed field validation
//! - [`StorageError`]: the key-value store or snapshot (de)serialization failed
//! - [`ConfigError`]: configuration could not be read or is inconsistent
//!
//! # Example
//!
//! ```rust,ignore
//! match board.apply(&job_id, draft).await {
//!     Ok(application) => println!("Applied: {}", application.id),
//!     Err(BoardError::Entity(EntityError::NotFound { id, .. })) => {
//!         println!("Job {} is gone", id);
//!     }
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use std::collections::BTreeMap;
use thiserror::Error;

/// Result alias used across the board API
pub type BoardResult<T> = Result<T, BoardError>;

/// The main error type for the job board
#[derive(Debug, Error)]
pub enum BoardError {
    /// Record-level errors (lookups, conflicts, refused actions)
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Draft validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persistence errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BoardError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BoardError::Entity(e) => e.error_code(),
            BoardError::Validation(e) => e.error_code(),
            BoardError::Storage(e) => e.error_code(),
            BoardError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl From<anyhow::Error> for BoardError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<EntityError>() {
            Ok(entity) => return BoardError::Entity(entity),
            Err(other) => other,
        };
        match err.downcast::<StorageError>() {
            Ok(storage) => BoardError::Storage(storage),
            Err(other) => BoardError::Storage(StorageError::Backend(format!("{:#}", other))),
        }
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record lookups and mutations
#[derive(Debug, Error)]
pub enum EntityError {
    /// Record was not found
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: String },

    /// A record with the same unique key already exists
    #[error("{entity_type} with {key} '{value}' already exists")]
    AlreadyExists {
        entity_type: String,
        key: String,
        value: String,
    },

    /// The action is not allowed in the record's current state
    #[error("Cannot {action} {entity_type} '{id}': {reason}")]
    Rejected {
        entity_type: String,
        id: String,
        action: String,
        reason: String,
    },
}

impl EntityError {
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
            EntityError::Rejected { .. } => "ENTITY_ACTION_REJECTED",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more fields failed validation
    #[error("Validation failed for {} field(s)", .0.len())]
    FieldErrors(BTreeMap<String, Vec<String>>),

    /// A single value is invalid
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_FAILED",
            ValidationError::InvalidValue { .. } => "INVALID_VALUE",
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for BoardError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BoardError::Validation(errors.into())
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed
    #[error("Storage I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot could not be (de)serialized
    #[error("Failed to serialize '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// An in-memory lock was poisoned by a panicking writer
    #[error("Storage lock poisoned: {0}")]
    LockPoisoned(String),

    /// Any other backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Io { .. } => "STORAGE_IO_ERROR",
            StorageError::Serialization { .. } => "STORAGE_SERIALIZATION_ERROR",
            StorageError::LockPoisoned(_) => "STORAGE_LOCK_POISONED",
            StorageError::Backend(_) => "STORAGE_ERROR",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The YAML could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The configuration parsed but is inconsistent
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Draft {
        #[validate(length(min = 3, message = "too short"))]
        title: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_not_found_message_and_code() {
        let err: BoardError = EntityError::not_found("job", "42").into();
        assert_eq!(err.to_string(), "job with id '42' not found");
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }

    #[test]
    fn test_validator_errors_are_collected_per_field() {
        let draft = Draft {
            title: "ab".to_string(),
            email: "nope".to_string(),
        };
        let err: BoardError = draft.validate().unwrap_err().into();

        match err {
            BoardError::Validation(ValidationError::FieldErrors(fields)) => {
                assert_eq!(fields["title"], vec!["too short".to_string()]);
                assert_eq!(fields["email"], vec!["email".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_anyhow_storage_error_is_preserved() {
        let err = anyhow::Error::new(StorageError::LockPoisoned("jobs".to_string()));
        let board: BoardError = err.into();
        assert_eq!(board.error_code(), "STORAGE_LOCK_POISONED");

        let board: BoardError = anyhow::anyhow!("disk full").into();
        assert_eq!(board.error_code(), "STORAGE_ERROR");
        assert!(board.to_string().contains("disk full"));
    }
}
