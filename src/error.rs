//! Error types for the signage store.
//!
//! The store uses a hierarchical error system:
//! - `SignageError` is the top-level error returned by all public APIs
//! - Specific error types (`StorageError`, `ValidationError`, `NotFoundError`)
//!   provide detail
//!
//! Every error also falls into one of three [`ErrorKind`]s. Endpoint handlers
//! map [`ErrorKind::Argument`] to a client error and the other two kinds to a
//! server error.
//!
//! # Error Handling Pattern
//! ```rust,ignore
//! use signage::{Config, Queue, Result};
//! use std::sync::Arc;
//!
//! fn example(config: Arc<Config>) -> Result<()> {
//!     let mut queue = Queue::new(config, "lobby")?;
//!     queue.load(false)?;
//!     queue.normalize()?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for signage store operations.
pub type Result<T> = std::result::Result<T, SignageError>;

/// Coarse classification of an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad or malformed input. The caller can recover by fixing the input.
    Argument,
    /// A bug or an inconsistent environment (corrupt record, failed delete,
    /// violated precondition).
    Internal,
    /// The filesystem failed underneath us (permissions, lock timeout).
    Io,
}

/// Top-level error enum for all signage store operations.
///
/// This is the only error type returned by public APIs.
/// Use [`SignageError::kind`] or pattern matching to handle specific cases.
#[derive(Debug, Error)]
pub enum SignageError {
    /// Storage layer error (corruption, serialization, locking, deletion).
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of what's wrong with the configuration.
        reason: String,
    },

    /// Requested entity not found.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// A precondition of the API was violated by the caller.
    #[error("Internal error: {reason}")]
    Internal {
        /// Which precondition failed.
        reason: String,
    },

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SignageError {
    /// Creates a configuration error with the given reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Creates an internal error with the given reason.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::NotFound(_) => ErrorKind::Argument,
            Self::Storage(StorageError::LockTimeout { .. }) | Self::Io(_) => ErrorKind::Io,
            Self::Storage(_) | Self::Config { .. } | Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Returns true if this error is caused by caller input.
    pub fn is_argument(&self) -> bool {
        self.kind() == ErrorKind::Argument
    }

    /// Returns true if this error signals a bug or a damaged environment.
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Storage-related errors.
///
/// These errors indicate problems with the files backing queues and slides.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A stored document exists but cannot be trusted.
    #[error("Record corrupted: {0}")]
    Corrupted(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The exclusive lock on a file was not granted in time.
    #[error("Timed out after {waited_ms} ms waiting for lock on {}", path.display())]
    LockTimeout {
        /// File whose lock was contended.
        path: PathBuf,
        /// How long we waited before giving up.
        waited_ms: u128,
    },

    /// A file that should be deleted could not be.
    #[error("Failed to remove {}: {reason}", path.display())]
    RemoveFailed {
        /// File that survived the delete.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },
}

impl StorageError {
    /// Creates a corruption error with the given message.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    /// Creates a serialization error with the given message.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a remove failure for the given path.
    pub fn remove_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::RemoveFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for SignageError {
    fn from(err: serde_json::Error) -> Self {
        SignageError::Storage(StorageError::from(err))
    }
}

/// Validation errors for input data.
///
/// These errors indicate problems with data provided by the caller.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("Required field missing: {field}")]
    RequiredField {
        /// Name of the missing field.
        field: String,
    },

    /// A name or identifier is longer than allowed.
    #[error("'{field}' too long: {len} chars (max: {max})")]
    TooLong {
        /// Name of the field.
        field: String,
        /// Actual length.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// A name or identifier contains characters outside `[A-Za-z0-9_-]`.
    #[error("'{field}' contains invalid characters: {value:?}")]
    InvalidCharacters {
        /// Name of the field.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// A field has an invalid value.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the invalid field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// Too many items in a collection field.
    #[error("Too many items in '{field}': {count} (max: {max})")]
    TooManyItems {
        /// Name of the field.
        field: String,
        /// Actual count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// An entity with this name already exists.
    #[error("{entity} already exists: {name}")]
    AlreadyExists {
        /// Kind of entity ("Queue", "Slide").
        entity: String,
        /// The clashing name.
        name: String,
    },
}

impl ValidationError {
    /// Creates a required field error.
    pub fn required_field(field: impl Into<String>) -> Self {
        Self::RequiredField {
            field: field.into(),
        }
    }

    /// Creates a too long error.
    pub fn too_long(field: impl Into<String>, len: usize, max: usize) -> Self {
        Self::TooLong {
            field: field.into(),
            len,
            max,
        }
    }

    /// Creates an invalid characters error.
    pub fn invalid_characters(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidCharacters {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a too many items error.
    pub fn too_many_items(field: impl Into<String>, count: usize, max: usize) -> Self {
        Self::TooManyItems {
            field: field.into(),
            count,
            max,
        }
    }

    /// Creates an already exists error.
    pub fn already_exists(entity: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity: entity.into(),
            name: name.into(),
        }
    }
}

/// Not found errors for specific entity types.
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// Queue with given name not found.
    #[error("Queue not found: {0}")]
    Queue(String),

    /// Slide with given ID not found.
    #[error("Slide not found: {0}")]
    Slide(String),

    /// Slide exists but is not a member of the queue.
    #[error("Slide {slide} is not in queue {queue}")]
    SlideNotInQueue {
        /// Queue that was searched.
        queue: String,
        /// Missing slide ID.
        slide: String,
    },
}

impl NotFoundError {
    /// Creates a queue not found error.
    pub fn queue(name: impl ToString) -> Self {
        Self::Queue(name.to_string())
    }

    /// Creates a slide not found error.
    pub fn slide(id: impl ToString) -> Self {
        Self::Slide(id.to_string())
    }

    /// Creates a slide-not-in-queue error.
    pub fn slide_not_in_queue(queue: impl ToString, slide: impl ToString) -> Self {
        Self::SlideNotInQueue {
            queue: queue.to_string(),
            slide: slide.to_string(),
        }
    }
}
