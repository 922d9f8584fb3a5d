//! Queue management module.
//!
//! A **queue** is a named, owned, ordered list of slides. It is persisted as
//! one JSON document, `<queues_dir>/<name>.json`, holding the owner and the
//! slide IDs in order. The slides themselves live in their own files, so a
//! queue and its slides are separate records that every operation here has
//! to keep consistent.
//!
//! # Lifecycle
//!
//! ```text
//! Queue::new(name)          name validated, no I/O
//!     │
//!     ▼
//! load(fix_errors)          queue file + every member slide; sets `loaded`
//!     │
//!     ├── add / remove_slide / juggle / normalize
//!     ├── create()          queue file, only if absent
//!     ├── write()           queue file only
//!     └── remove()          every slide file, then the queue file
//! ```
//!
//! # Consistency
//!
//! Each file read or write is atomic under its own lock. Nothing locks a
//! queue together with its slides: `normalize`, `juggle` and `remove` are
//! sequences of single-file operations, and another process may observe the
//! sequence half-applied. `remove` deletes the slides first so that the
//! queue file survives a partial failure and the removal can be retried.

mod ordering;
pub mod slides;

pub use slides::SlideList;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{ErrorKind, NotFoundError, Result, SignageError, StorageError, ValidationError};
use crate::slide::{Slide, SlideExport};
use crate::storage::schema::{FILE_SUFFIX, HIDDEN_PREFIX};
use crate::storage::{
    create_document, read_document, write_document, LockedFileStore, QueueDocument,
};
use crate::types::SlideId;
use crate::validation::{validate_queue_name, validate_username};

/// A slide queue.
///
/// # Example
///
/// ```rust,ignore
/// use signage::{Config, Queue};
/// use std::sync::Arc;
///
/// let config = Arc::new(Config::with_root("/srv/signage"));
///
/// for name in Queue::list(&config)? {
///     let mut queue = Queue::new(config.clone(), &name)?;
///     queue.load(true)?;
///     println!("{}: {} slides", name, queue.len());
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Queue {
    name: String,
    owner: Option<String>,
    slides: SlideList,
    loaded: bool,
    config: Arc<Config>,
}

impl Queue {
    /// Creates an empty, unloaded queue handle.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `name` is empty, too long, or contains
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn new(config: Arc<Config>, name: &str) -> Result<Self> {
        validate_queue_name(&config, name)?;
        Ok(Self {
            name: name.to_string(),
            owner: None,
            slides: SlideList::new(),
            loaded: false,
            config,
        })
    }

    /// Queue name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the queue in memory.
    ///
    /// The old file is left alone; the next [`write()`](Queue::write) creates
    /// the file for the new name.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        validate_queue_name(&self.config, name)?;
        self.name = name.to_string();
        Ok(())
    }

    /// Owner, if set.
    #[inline]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Sets the owner.
    pub fn set_owner(&mut self, owner: &str) -> Result<()> {
        validate_username(&self.config, owner)?;
        self.owner = Some(owner.to_string());
        Ok(())
    }

    /// Returns true once [`load()`](Queue::load) has succeeded.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Path of the queue document.
    pub fn path(&self) -> PathBuf {
        self.config.queue_path(&self.name)
    }

    /// Slides in queue order.
    #[inline]
    pub fn slides(&self) -> &[Slide] {
        self.slides.as_slice()
    }

    /// Returns the member slide with the given ID.
    pub fn get_slide(&self, id: &SlideId) -> Option<&Slide> {
        self.slides.get(id)
    }

    /// Returns the member slide with the given ID, mutably.
    pub fn get_slide_mut(&mut self, id: &SlideId) -> Option<&mut Slide> {
        self.slides.get_mut(id)
    }

    /// Number of slides.
    #[inline]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Returns true if the queue has no slides.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Adds a slide (in memory). A slide with the same ID is replaced in
    /// place and returned.
    pub fn add(&mut self, slide: Slide) -> Option<Slide> {
        self.slides.add(slide)
    }

    /// Removes a slide by ID (in memory). Neither file is touched.
    pub fn remove_slide(&mut self, id: &SlideId) -> Option<Slide> {
        self.slides.remove(id)
    }

    /// Loads the queue document and every slide it references.
    ///
    /// With `fix_errors`, references whose slide is missing or damaged
    /// (argument- or internal-kind errors) are dropped and the cleaned queue
    /// is written back before returning. Without it, or for any I/O-kind
    /// error, the first failure is returned and the queue stays unloaded;
    /// discard it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the queue file does not exist
    /// - `Storage(Corrupted)` if it cannot be parsed
    /// - `Validation` if the stored owner is not a valid username
    /// - the first per-slide error, unless `fix_errors` absorbs it
    #[instrument(skip(self), fields(queue = %self.name))]
    pub fn load(&mut self, fix_errors: bool) -> Result<()> {
        self.loaded = false;

        let store = LockedFileStore::from_config(&self.config);
        let doc: QueueDocument = read_document(&store, &self.path())?
            .ok_or_else(|| NotFoundError::queue(&self.name))?;
        validate_username(&self.config, &doc.owner)?;

        let mut slides = SlideList::new();
        let mut fixed = false;
        for raw in &doc.slides {
            match self.load_member(&slides, raw) {
                Ok(slide) => {
                    slides.add(slide);
                }
                Err(e) if fix_errors && is_prunable(&e) => {
                    warn!(slide = %raw, error = %e, "Dropping invalid slide reference");
                    fixed = true;
                }
                Err(e) => return Err(e),
            }
        }

        self.owner = Some(doc.owner);
        self.slides = slides;

        if fixed {
            self.write()?;
            info!(slides = self.slides.len(), "Queue repaired");
        }

        self.loaded = true;
        debug!(slides = self.slides.len(), "Queue loaded");
        Ok(())
    }

    fn load_member(&self, loaded: &SlideList, raw: &str) -> Result<Slide> {
        let id = SlideId::parse(raw)?;
        if loaded.contains(&id) {
            return Err(ValidationError::invalid_field(
                "slides",
                format!("duplicate slide reference {}", id),
            )
            .into());
        }
        Slide::load(self.config.clone(), &id)
    }

    /// Writes the queue document, fully replacing the previous one.
    ///
    /// Only the queue file is written; slides are persisted on their own.
    ///
    /// # Errors
    ///
    /// Returns a validation error if no owner is set.
    pub fn write(&self) -> Result<()> {
        let doc = self.to_document()?;

        let store = LockedFileStore::from_config(&self.config);
        write_document(&store, &self.path(), &doc)?;

        debug!(queue = %self.name, slides = doc.slides.len(), "Queue written");
        Ok(())
    }

    /// Writes the queue document only if no queue of this name is stored.
    ///
    /// # Errors
    ///
    /// - `Validation` if no owner is set
    /// - `Validation(AlreadyExists)` if the queue file already exists
    pub fn create(&self) -> Result<()> {
        let doc = self.to_document()?;

        let store = LockedFileStore::from_config(&self.config);
        if !create_document(&store, &self.path(), &doc)? {
            return Err(ValidationError::already_exists("Queue", &self.name).into());
        }

        debug!(queue = %self.name, "Queue file created");
        Ok(())
    }

    fn to_document(&self) -> Result<QueueDocument> {
        let owner = self
            .owner
            .as_ref()
            .ok_or_else(|| ValidationError::required_field("owner"))?;

        Ok(QueueDocument {
            owner: owner.clone(),
            slides: self.slides.iter().map(|s| s.id().to_string()).collect(),
        })
    }

    /// Deletes every member slide file, then the queue file.
    ///
    /// Slides are dropped from memory as their files go, so calling
    /// `remove()` again after a partial failure continues where it stopped.
    ///
    /// # Errors
    ///
    /// - `Internal` if the queue was never loaded
    /// - `NotFound` if the queue file is gone
    /// - the first slide removal error
    /// - `Storage(RemoveFailed)` if the queue file cannot be deleted
    #[instrument(skip(self), fields(queue = %self.name))]
    pub fn remove(&mut self) -> Result<()> {
        if !self.loaded {
            return Err(SignageError::internal(format!(
                "queue {} must be loaded before it is removed",
                self.name
            )));
        }

        let path = self.path();
        if !path.try_exists()? {
            return Err(NotFoundError::queue(&self.name).into());
        }

        let count = self.slides.len();
        for id in self.slides.ids() {
            if let Some(slide) = self.slides.get(&id) {
                slide.remove()?;
            }
            self.slides.remove(&id);
        }

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(NotFoundError::queue(&self.name).into());
            }
            Err(e) => return Err(StorageError::remove_failed(path, e).into()),
        }

        self.loaded = false;
        info!(slides = count, "Queue removed");
        Ok(())
    }

    /// Lists the names of all stored queues.
    ///
    /// Entries of `queues_dir` that start with `.` or do not end in `.json`
    /// are skipped, as are non-UTF-8 names. The order is whatever the
    /// directory yields. A missing directory lists as empty.
    pub fn list(config: &Config) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&config.queues_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let file_name = entry?.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name.starts_with(HIDDEN_PREFIX) {
                continue;
            }
            if let Some(name) = file_name.strip_suffix(FILE_SUFFIX) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Returns true if a queue called `name` is stored.
    pub fn exists(config: &Config, name: &str) -> Result<bool> {
        Ok(Self::list(config)?.iter().any(|n| n == name))
    }

    /// Returns the public view of this queue.
    pub fn export(&self) -> QueueExport {
        QueueExport {
            name: self.name.clone(),
            owner: self.owner.clone(),
            slides: self.slides.iter().map(Slide::export).collect(),
        }
    }
}

/// I/O-kind errors say nothing about the reference itself, so they are never
/// pruned.
fn is_prunable(err: &SignageError) -> bool {
    matches!(err.kind(), ErrorKind::Argument | ErrorKind::Internal)
}

/// Public view of a queue, as returned to endpoint callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueueExport {
    /// Queue name.
    pub name: String,
    /// Username of the owner.
    pub owner: Option<String>,
    /// Member slides in queue order.
    pub slides: Vec<SlideExport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (Arc<Config>, TempDir) {
        let dir = tempdir().unwrap();
        let config = Config::with_root(dir.path());
        fs::create_dir_all(&config.queues_dir).unwrap();
        fs::create_dir_all(&config.slides_dir).unwrap();
        (Arc::new(config), dir)
    }

    fn stored_slide(config: &Arc<Config>, index: usize) -> Slide {
        let mut slide = Slide::new(config.clone(), "alice", "lobby").unwrap();
        slide.set_index(index);
        slide.write().unwrap();
        slide
    }

    #[test]
    fn test_new_validates_name() {
        let config = Arc::new(Config::default());
        assert!(Queue::new(config.clone(), "lobby").is_ok());

        let err = Queue::new(config.clone(), "").unwrap_err();
        assert!(err.is_validation());
        assert!(Queue::new(config.clone(), &"q".repeat(33)).is_err());
        assert!(Queue::new(config, "../../etc/passwd").is_err());
    }

    #[test]
    fn test_set_name_revalidates() {
        let mut queue = Queue::new(Arc::new(Config::default()), "lobby").unwrap();
        assert!(queue.set_name("bad name").is_err());
        assert_eq!(queue.name(), "lobby");
        queue.set_name("hall").unwrap();
        assert_eq!(queue.name(), "hall");
    }

    #[test]
    fn test_write_requires_owner() {
        let (config, _dir) = setup();
        let queue = Queue::new(config, "lobby").unwrap();
        let err = queue.write().unwrap_err();
        assert!(err.is_argument());
        assert!(!queue.path().exists());
    }

    #[test]
    fn test_write_then_load() {
        let (config, _dir) = setup();
        let a = stored_slide(&config, 0);
        let b = stored_slide(&config, 1);

        let mut queue = Queue::new(config.clone(), "lobby").unwrap();
        queue.set_owner("alice").unwrap();
        queue.add(a.clone());
        queue.add(b.clone());
        queue.write().unwrap();

        let mut loaded = Queue::new(config, "lobby").unwrap();
        assert!(!loaded.is_loaded());
        loaded.load(false).unwrap();
        assert!(loaded.is_loaded());
        assert_eq!(loaded.owner(), Some("alice"));
        let ids: Vec<&SlideId> = loaded.slides().iter().map(Slide::id).collect();
        assert_eq!(ids, vec![a.id(), b.id()]);
    }

    #[test]
    fn test_load_missing_queue() {
        let (config, _dir) = setup();
        let mut queue = Queue::new(config, "ghost").unwrap();
        let err = queue.load(true).unwrap_err();
        assert!(err.is_not_found());
        assert!(!queue.is_loaded());
    }

    #[test]
    fn test_load_rejects_bad_stored_owner() {
        let (config, _dir) = setup();
        fs::write(
            config.queue_path("lobby"),
            r#"{"owner":"not a user","slides":[]}"#,
        )
        .unwrap();

        let mut queue = Queue::new(config, "lobby").unwrap();
        assert!(queue.load(true).unwrap_err().is_validation());
    }

    #[test]
    fn test_load_fix_errors_drops_duplicate_and_bad_ids() {
        let (config, _dir) = setup();
        let a = stored_slide(&config, 0);
        let doc = serde_json::json!({
            "owner": "alice",
            "slides": [a.id().as_str(), "../escape", a.id().as_str()]
        });
        fs::write(config.queue_path("lobby"), doc.to_string()).unwrap();

        let mut strict = Queue::new(config.clone(), "lobby").unwrap();
        assert!(strict.load(false).unwrap_err().is_argument());

        let mut queue = Queue::new(config.clone(), "lobby").unwrap();
        queue.load(true).unwrap();
        assert_eq!(queue.len(), 1);

        let stored: QueueDocument =
            serde_json::from_slice(&fs::read(config.queue_path("lobby")).unwrap()).unwrap();
        assert_eq!(stored.slides, vec![a.id().to_string()]);
    }

    #[test]
    fn test_remove_requires_load() {
        let (config, _dir) = setup();
        let mut queue = Queue::new(config, "lobby").unwrap();
        queue.set_owner("alice").unwrap();
        queue.write().unwrap();

        let err = queue.remove().unwrap_err();
        assert!(err.is_internal());
        assert!(queue.path().exists());
    }

    #[test]
    fn test_list_filters_entries() {
        let (config, _dir) = setup();
        fs::write(config.queues_dir.join("q1.json"), "{}").unwrap();
        fs::write(config.queues_dir.join(".hidden.json"), "{}").unwrap();
        fs::write(config.queues_dir.join("notjson.txt"), "").unwrap();

        assert_eq!(Queue::list(&config).unwrap(), vec!["q1".to_string()]);
        assert!(Queue::exists(&config, "q1").unwrap());
        assert!(!Queue::exists(&config, "notjson").unwrap());
        assert!(!Queue::exists(&config, ".hidden").unwrap());
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let config = Config::with_root(dir.path().join("nowhere"));
        assert!(Queue::list(&config).unwrap().is_empty());
    }

    #[test]
    fn test_export() {
        let (config, _dir) = setup();
        let a = stored_slide(&config, 0);
        let mut queue = Queue::new(config, "lobby").unwrap();
        queue.set_owner("alice").unwrap();
        queue.add(a.clone());

        let export = queue.export();
        assert_eq!(export.name, "lobby");
        assert_eq!(export.owner.as_deref(), Some("alice"));
        assert_eq!(export.slides, vec![a.export()]);
    }
}
