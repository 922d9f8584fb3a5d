//! Type definitions for slides.
//!
//! A **slide** is one unit of signage content. It lives in its own JSON file
//! and carries its playback position (`index`) within the queue it belongs
//! to. The queue only ever touches `id`, `owner` and `index`.

use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::error::{StorageError, ValidationError};
use crate::storage::schema::{SlideDocument, DEFAULT_DURATION_MS};
use crate::types::SlideId;
use crate::validation::{validate_queue_name, validate_username};

/// A slide loaded into memory.
///
/// Setters for content fields validate their input. `set_index` does not:
/// any non-negative index is legal and queues renumber slides freely.
/// Nothing reaches disk until [`write()`](Slide::write) is called.
#[derive(Clone, Debug)]
pub struct Slide {
    pub(crate) id: SlideId,
    pub(crate) owner: String,
    pub(crate) index: usize,
    pub(crate) queue_name: String,
    pub(crate) name: String,
    pub(crate) duration_ms: u64,
    pub(crate) markup: String,
    pub(crate) enabled: bool,
    pub(crate) collaborators: Vec<String>,
    pub(crate) config: Arc<Config>,
}

impl Slide {
    /// Creates a new, unsaved slide with a fresh ID.
    ///
    /// The slide starts at index 0, enabled, with an empty markup and the
    /// default duration. Its display name defaults to `"Untitled"`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `owner` or `queue_name` is not a valid
    /// name.
    pub fn new(
        config: Arc<Config>,
        owner: &str,
        queue_name: &str,
    ) -> Result<Self, ValidationError> {
        validate_username(&config, owner)?;
        validate_queue_name(&config, queue_name)?;

        Ok(Self {
            id: SlideId::new(),
            owner: owner.to_string(),
            index: 0,
            queue_name: queue_name.to_string(),
            name: "Untitled".to_string(),
            duration_ms: DEFAULT_DURATION_MS,
            markup: String::new(),
            enabled: true,
            collaborators: Vec::new(),
            config,
        })
    }

    /// Slide ID.
    #[inline]
    pub fn id(&self) -> &SlideId {
        &self.id
    }

    /// Username of the owner.
    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Playback position within the queue.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves the slide to `index` (in memory only).
    #[inline]
    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Name of the queue this slide belongs to.
    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Slide markup.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Whether the slide is played.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Users allowed to edit besides the owner.
    pub fn collaborators(&self) -> &[String] {
        &self.collaborators
    }

    /// Returns true if `user` owns the slide or collaborates on it.
    pub fn can_edit(&self, user: &str) -> bool {
        self.owner == user || self.collaborators.iter().any(|c| c == user)
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        validate_queue_name(&self.config, name)?;
        self.name = name.to_string();
        Ok(())
    }

    /// Moves the slide to another queue (in memory only).
    pub fn set_queue_name(&mut self, queue_name: &str) -> Result<(), ValidationError> {
        validate_queue_name(&self.config, queue_name)?;
        self.queue_name = queue_name.to_string();
        Ok(())
    }

    /// Sets the display duration.
    pub fn set_duration_ms(&mut self, duration_ms: u64) -> Result<(), ValidationError> {
        super::validate_duration(duration_ms)?;
        self.duration_ms = duration_ms;
        Ok(())
    }

    /// Replaces the markup.
    pub fn set_markup(&mut self, markup: impl Into<String>) -> Result<(), ValidationError> {
        let markup = markup.into();
        super::validate_markup(&markup)?;
        self.markup = markup;
        Ok(())
    }

    /// Enables or disables playback.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Replaces the collaborator list.
    pub fn set_collaborators(&mut self, collaborators: Vec<String>) -> Result<(), ValidationError> {
        super::validate_collaborators(&self.config, &self.owner, &collaborators)?;
        self.collaborators = collaborators;
        Ok(())
    }

    /// Returns the public view of this slide.
    pub fn export(&self) -> SlideExport {
        SlideExport {
            id: self.id.to_string(),
            name: self.name.clone(),
            index: self.index,
            duration_ms: self.duration_ms,
            markup: self.markup.clone(),
            enabled: self.enabled,
            owner: self.owner.clone(),
            queue_name: self.queue_name.clone(),
            collaborators: self.collaborators.clone(),
        }
    }

    pub(crate) fn to_document(&self) -> SlideDocument {
        SlideDocument {
            id: self.id.to_string(),
            owner: self.owner.clone(),
            index: self.index,
            queue_name: self.queue_name.clone(),
            name: self.name.clone(),
            duration_ms: self.duration_ms,
            markup: self.markup.clone(),
            enabled: self.enabled,
            collaborators: self.collaborators.clone(),
        }
    }

    /// Rebuilds a slide from its stored document.
    ///
    /// Anything wrong with a stored document is corruption, not bad input:
    /// the caller asked for a valid ID and got a damaged record.
    pub(crate) fn from_document(
        config: Arc<Config>,
        expected: &SlideId,
        doc: SlideDocument,
    ) -> Result<Self, StorageError> {
        if doc.id != expected.as_str() {
            return Err(StorageError::corrupted(format!(
                "slide file {} holds slide {:?}",
                expected, doc.id
            )));
        }

        let slide = Self {
            id: expected.clone(),
            owner: doc.owner,
            index: doc.index,
            queue_name: doc.queue_name,
            name: doc.name,
            duration_ms: doc.duration_ms,
            markup: doc.markup,
            enabled: doc.enabled,
            collaborators: doc.collaborators,
            config,
        };

        super::validate_slide(&slide)
            .map_err(|e| StorageError::corrupted(format!("slide {}: {}", expected, e)))?;
        Ok(slide)
    }
}

/// Fields for a slide about to be created.
///
/// `None` fields take the defaults of [`Slide::new`]. A `None` index puts
/// the slide at the end of its queue.
#[derive(Clone, Debug, Default)]
pub struct NewSlide {
    /// Username of the owner.
    pub owner: String,
    /// Display name.
    pub name: Option<String>,
    /// Display duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Slide markup.
    pub markup: String,
    /// Whether the slide starts disabled.
    pub disabled: bool,
    /// Requested playback position.
    pub index: Option<usize>,
}

/// Public view of a slide, as returned to endpoint callers.
///
/// The owning [`Config`] and other internal state are never exported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlideExport {
    /// Slide ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Playback position.
    pub index: usize,
    /// Display duration in milliseconds.
    pub duration_ms: u64,
    /// Slide markup.
    pub markup: String,
    /// Whether the slide is played.
    pub enabled: bool,
    /// Username of the owner.
    pub owner: String,
    /// Queue the slide belongs to.
    pub queue_name: String,
    /// Users allowed to edit besides the owner.
    pub collaborators: Vec<String>,
}
