//! Signage store handle.
//!
//! The [`Signage`] struct bundles the operations an endpoint handler
//! performs on queues and slides:
//!
//! - Opening the store (validating config, creating directories)
//! - Creating, reading, listing and removing queues
//! - Adding, moving and removing slides within a queue
//!
//! Every read goes through `load(fix_errors = true)`, so dangling slide
//! references are pruned from a queue the first time it is touched.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use signage::{Config, NewSlide, Signage};
//!
//! let store = Signage::open(Config::with_root("/srv/signage"))?;
//!
//! store.create_queue("lobby", "alice")?;
//! let slide = store.add_slide("lobby", NewSlide {
//!     owner: "alice".to_string(),
//!     markup: "[h1]Welcome[/h1]".to_string(),
//!     ..Default::default()
//! })?;
//!
//! // Move it to the front
//! store.move_slide("lobby", slide.id(), 0)?;
//! ```
//!
//! # Thread Safety
//!
//! `Signage` is `Send + Sync` and cheap to clone. Each call works on its own
//! `Queue` value, so calls from several threads only interact through the
//! file locks.

use std::fs;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::Config;
use crate::error::{NotFoundError, Result, SignageError};
use crate::queue::Queue;
use crate::slide::{NewSlide, Slide};
use crate::types::SlideId;

/// The main signage store handle.
#[derive(Clone, Debug)]
pub struct Signage {
    config: Arc<Config>,
}

impl Signage {
    /// Opens the store described by `config`.
    ///
    /// Creates the queues and slides directories if they do not exist.
    ///
    /// # Errors
    ///
    /// - `Config` if the configuration is invalid (see [`Config::validate`])
    /// - `Io` if a directory cannot be created
    #[instrument(skip(config), fields(queues = %config.queues_dir.display()))]
    pub fn open(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SignageError::config(e.to_string()))?;

        info!("Opening signage store");

        fs::create_dir_all(&config.queues_dir)?;
        fs::create_dir_all(&config.slides_dir)?;

        info!(
            slides = %config.slides_dir.display(),
            lock_timeout = ?config.lock_timeout,
            "Signage store opened"
        );

        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Returns the configuration this store was opened with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a shared handle to the configuration, for building queues
    /// and slides directly.
    #[inline]
    pub fn shared_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    // =========================================================================
    // Queues
    // =========================================================================

    /// Creates an empty queue owned by `owner`.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name or owner is invalid
    /// - `Validation(AlreadyExists)` if a queue of that name is stored
    #[instrument(skip(self))]
    pub fn create_queue(&self, name: &str, owner: &str) -> Result<Queue> {
        let mut queue = Queue::new(self.shared_config(), name)?;
        queue.set_owner(owner)?;

        queue.create()?;
        queue.load(false)?;

        info!("Queue created");
        Ok(queue)
    }

    /// Loads a queue, pruning dangling slide references.
    #[instrument(skip(self))]
    pub fn queue(&self, name: &str) -> Result<Queue> {
        let mut queue = Queue::new(self.shared_config(), name)?;
        queue.load(true)?;
        Ok(queue)
    }

    /// Lists the names of all stored queues (unsorted).
    pub fn list_queues(&self) -> Result<Vec<String>> {
        Queue::list(&self.config)
    }

    /// Returns true if a queue called `name` is stored.
    pub fn queue_exists(&self, name: &str) -> Result<bool> {
        Queue::exists(&self.config, name)
    }

    /// Removes a queue together with all of its slides.
    #[instrument(skip(self))]
    pub fn remove_queue(&self, name: &str) -> Result<()> {
        let mut queue = self.queue(name)?;
        queue.remove()
    }

    // =========================================================================
    // Slides
    // =========================================================================

    /// Loads a single slide.
    pub fn slide(&self, id: &SlideId) -> Result<Slide> {
        Slide::load(self.shared_config(), id)
    }

    /// Creates a slide in `queue_name`.
    ///
    /// The slide is written first, then juggled into place at
    /// `new.index` (or appended), then the queue file is written. A crash in
    /// between leaves an unreferenced slide file, never a dangling reference.
    #[instrument(skip(self, new), fields(owner = %new.owner))]
    pub fn add_slide(&self, queue_name: &str, new: NewSlide) -> Result<Slide> {
        let mut queue = self.queue(queue_name)?;

        let mut slide = Slide::new(self.shared_config(), &new.owner, queue_name)?;
        if let Some(name) = &new.name {
            slide.set_name(name)?;
        }
        if let Some(duration_ms) = new.duration_ms {
            slide.set_duration_ms(duration_ms)?;
        }
        slide.set_markup(new.markup)?;
        slide.set_enabled(!new.disabled);
        slide.set_index(new.index.unwrap_or(queue.len()));
        slide.write()?;

        let id = slide.id().clone();
        queue.add(slide);
        queue.juggle(&id)?;
        queue.write()?;

        info!(slide = %id, "Slide added");
        self.member(&queue, &id)
    }

    /// Moves a slide of `queue_name` to `index`, shifting the others.
    #[instrument(skip(self, id), fields(slide = %id))]
    pub fn move_slide(&self, queue_name: &str, id: &SlideId, index: usize) -> Result<Slide> {
        let mut queue = self.queue(queue_name)?;

        let slide = queue
            .get_slide_mut(id)
            .ok_or_else(|| NotFoundError::slide_not_in_queue(queue_name, id))?;
        slide.set_index(index);
        slide.write()?;

        queue.juggle(id)?;
        queue.write()?;
        self.member(&queue, id)
    }

    /// Removes a slide from `queue_name` and deletes its file.
    ///
    /// The queue is renumbered and written before the slide file goes, so a
    /// failure leaves at worst an unreferenced slide file.
    #[instrument(skip(self, id), fields(slide = %id))]
    pub fn remove_slide(&self, queue_name: &str, id: &SlideId) -> Result<()> {
        let mut queue = self.queue(queue_name)?;

        let slide = queue
            .remove_slide(id)
            .ok_or_else(|| NotFoundError::slide_not_in_queue(queue_name, id))?;
        queue.normalize()?;
        queue.write()?;
        slide.remove()?;

        info!("Slide removed");
        Ok(())
    }

    fn member(&self, queue: &Queue, id: &SlideId) -> Result<Slide> {
        queue.get_slide(id).cloned().ok_or_else(|| {
            SignageError::internal(format!("slide {} vanished from queue {}", id, queue.name()))
        })
    }
}
