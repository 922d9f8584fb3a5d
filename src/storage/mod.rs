//! Storage layer for the signage store.
//!
//! There is no database: every queue and every slide is a JSON document in
//! its own file. This module provides the pieces every entity uses to touch
//! those files.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Queue / Slide                               │
//! │                       │                                     │
//! │                       ▼                                     │
//! │         read_document / write_document   ← JSON mapping     │
//! │                       │                                     │
//! │                       ▼                                     │
//! │              ┌─────────────────────┐                        │
//! │              │  LockedFileStore    │  ← fs2 exclusive lock  │
//! │              └─────────────────────┘                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod locked;
pub mod schema;

pub use locked::LockedFileStore;
pub use schema::{QueueDocument, SlideDocument};

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorageError};

/// Reads and parses the document at `path`.
///
/// Returns `Ok(None)` if the file does not exist (or is still empty). A file that exists but
/// does not parse is reported as [`StorageError::Corrupted`].
pub fn read_document<T: DeserializeOwned>(
    store: &LockedFileStore,
    path: &Path,
) -> Result<Option<T>> {
    let Some(bytes) = store.read(path)? else {
        return Ok(None);
    };

    let doc = serde_json::from_slice(&bytes).map_err(|e| {
        StorageError::corrupted(format!("{}: {}", path.display(), e))
    })?;
    Ok(Some(doc))
}

/// Serializes `doc` and replaces the file at `path` with it.
pub fn write_document<T: Serialize>(store: &LockedFileStore, path: &Path, doc: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(doc).map_err(StorageError::from)?;
    store.write(path, &bytes)
}

/// Serializes `doc` into a new file at `path`.
///
/// Returns `Ok(false)` if a file already exists there.
pub fn create_document<T: Serialize>(
    store: &LockedFileStore,
    path: &Path,
    doc: &T,
) -> Result<bool> {
    let bytes = serde_json::to_vec_pretty(doc).map_err(StorageError::from)?;
    store.create(path, &bytes)
}
