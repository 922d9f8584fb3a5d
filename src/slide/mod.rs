//! Slide records.
//!
//! A **slide** is an individually persisted unit of content with an owner
//! and an ordering index. Queues reference slides by ID; the slide record
//! itself lives in `<slides_dir>/<id>.json`.
//!
//! # Operations
//!
//! - [`Slide::new`] - fresh slide with a generated ID (not yet on disk)
//! - [`Slide::load`] - read a slide by ID
//! - [`Slide::write`] - validate and persist (full overwrite)
//! - [`Slide::remove`] - delete the slide file
//!
//! # Errors
//!
//! | Situation | Error | Kind |
//! |-----------|-------|------|
//! | file missing | `NotFound` | Argument |
//! | file unparsable or inconsistent | `Storage(Corrupted)` | Internal |
//! | delete failed | `Storage(RemoveFailed)` | Internal |

pub mod types;

pub use types::{NewSlide, Slide, SlideExport};

use std::fs;
use std::io;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{NotFoundError, Result, StorageError, ValidationError};
use crate::storage::schema::{MAX_COLLABORATORS, MAX_DURATION_MS, MAX_MARKUP_SIZE};
use crate::storage::{read_document, write_document, LockedFileStore, SlideDocument};
use crate::types::SlideId;
use crate::validation::{validate_queue_name, validate_username};

impl Slide {
    /// Loads the slide with the given ID.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no file exists for `id`
    /// - `Storage(Corrupted)` if the file cannot be parsed or fails validation
    #[instrument(skip(config, id), fields(slide = %id))]
    pub fn load(config: Arc<Config>, id: &SlideId) -> Result<Self> {
        let store = LockedFileStore::from_config(&config);
        let path = config.slide_path(id.as_str());

        let doc: SlideDocument =
            read_document(&store, &path)?.ok_or_else(|| NotFoundError::slide(id))?;
        let slide = Slide::from_document(config, id, doc)?;

        debug!(index = slide.index, "Slide loaded");
        Ok(slide)
    }

    /// Validates the slide and writes it to disk, replacing any previous
    /// version.
    pub fn write(&self) -> Result<()> {
        validate_slide(self)?;

        let store = LockedFileStore::from_config(&self.config);
        let path = self.config.slide_path(self.id.as_str());
        write_document(&store, &path, &self.to_document())?;

        debug!(slide = %self.id, index = self.index, "Slide written");
        Ok(())
    }

    /// Deletes the slide file.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file is already gone
    /// - `Storage(RemoveFailed)` if it exists but cannot be deleted
    pub fn remove(&self) -> Result<()> {
        let path = self.config.slide_path(self.id.as_str());
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(slide = %self.id, "Slide removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(NotFoundError::slide(&self.id).into())
            }
            Err(e) => Err(StorageError::remove_failed(path, e).into()),
        }
    }
}

/// Validates every field of a slide.
///
/// # Rules
///
/// | Field | Constraint |
/// |-------|------------|
/// | `owner` | username rule |
/// | `queue_name`, `name` | queue-name rule |
/// | `duration_ms` | 1 ms – 10 min |
/// | `markup` | max 64 KB |
/// | `collaborators` | max 32, valid usernames, unique, not the owner |
pub(crate) fn validate_slide(slide: &Slide) -> std::result::Result<(), ValidationError> {
    let config = &slide.config;
    validate_username(config, &slide.owner)?;
    validate_queue_name(config, &slide.queue_name)?;
    validate_queue_name(config, &slide.name)?;
    validate_duration(slide.duration_ms)?;
    validate_markup(&slide.markup)?;
    validate_collaborators(config, &slide.owner, &slide.collaborators)?;
    Ok(())
}

pub(crate) fn validate_duration(duration_ms: u64) -> std::result::Result<(), ValidationError> {
    if duration_ms == 0 || duration_ms > MAX_DURATION_MS {
        return Err(ValidationError::invalid_field(
            "duration_ms",
            format!("must be between 1 and {}, got {}", MAX_DURATION_MS, duration_ms),
        ));
    }
    Ok(())
}

pub(crate) fn validate_markup(markup: &str) -> std::result::Result<(), ValidationError> {
    if markup.len() > MAX_MARKUP_SIZE {
        return Err(ValidationError::invalid_field(
            "markup",
            format!(
                "exceeds max size of {} bytes (got {})",
                MAX_MARKUP_SIZE,
                markup.len()
            ),
        ));
    }
    Ok(())
}

pub(crate) fn validate_collaborators(
    config: &Config,
    owner: &str,
    collaborators: &[String],
) -> std::result::Result<(), ValidationError> {
    if collaborators.len() > MAX_COLLABORATORS {
        return Err(ValidationError::too_many_items(
            "collaborators",
            collaborators.len(),
            MAX_COLLABORATORS,
        ));
    }

    for (i, user) in collaborators.iter().enumerate() {
        validate_username(config, user)?;
        if user == owner {
            return Err(ValidationError::invalid_field(
                "collaborators",
                "the owner cannot be a collaborator",
            ));
        }
        if collaborators[..i].contains(user) {
            return Err(ValidationError::invalid_field(
                "collaborators",
                format!("duplicate collaborator {:?}", user),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignageError;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (Arc<Config>, TempDir) {
        let dir = tempdir().unwrap();
        let config = Config::with_root(dir.path());
        fs::create_dir_all(&config.slides_dir).unwrap();
        (Arc::new(config), dir)
    }

    #[test]
    fn test_write_then_load() {
        let (config, _dir) = setup();
        let mut slide = Slide::new(config.clone(), "alice", "lobby").unwrap();
        slide.set_index(4);
        slide.write().unwrap();

        let loaded = Slide::load(config, slide.id()).unwrap();
        assert_eq!(loaded.index(), 4);
        assert_eq!(loaded.owner(), "alice");
    }

    #[test]
    fn test_load_missing_is_argument_error() {
        let (config, _dir) = setup();
        let err = Slide::load(config, &SlideId::new()).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.is_argument());
    }

    #[test]
    fn test_load_corrupt_is_internal_error() {
        let (config, _dir) = setup();
        let id = SlideId::new();
        fs::write(config.slide_path(id.as_str()), b"not json").unwrap();

        let err = Slide::load(config, &id).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_load_invalid_stored_fields_is_corruption() {
        let (config, _dir) = setup();
        let id = SlideId::parse("s1").unwrap();
        let doc = serde_json::json!({
            "id": "s1", "owner": "bad owner", "index": 0,
            "queue_name": "q", "name": "n", "duration_ms": 1000
        });
        fs::write(config.slide_path("s1"), doc.to_string()).unwrap();

        let err = Slide::load(config, &id).unwrap_err();
        assert!(matches!(err, SignageError::Storage(StorageError::Corrupted(_))));
    }

    #[test]
    fn test_remove() {
        let (config, _dir) = setup();
        let slide = Slide::new(config.clone(), "alice", "lobby").unwrap();
        slide.write().unwrap();
        let path = config.slide_path(slide.id().as_str());
        assert!(path.exists());

        slide.remove().unwrap();
        assert!(!path.exists());

        let err = slide.remove().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_collaborator_rules() {
        let config = Config::default();
        let many: Vec<String> = (0..33).map(|i| format!("user{i}")).collect();
        assert!(validate_collaborators(&config, "alice", &many).is_err());
        assert!(validate_collaborators(
            &config,
            "alice",
            &["bob".to_string(), "bob".to_string()]
        )
        .is_err());
        assert!(validate_collaborators(&config, "alice", &["bob".to_string()]).is_ok());
    }

    #[test]
    fn test_markup_limit() {
        assert!(validate_markup(&"x".repeat(MAX_MARKUP_SIZE)).is_ok());
        assert!(validate_markup(&"x".repeat(MAX_MARKUP_SIZE + 1)).is_err());
    }
}
