//! Ordered slide container keyed by slide identity.

use crate::slide::Slide;
use crate::types::SlideId;

/// The slides of a queue, in queue order.
///
/// At most one slide per [`SlideId`] is held. Order is insertion order until
/// [`sort_by_index`](SlideList::sort_by_index) is called.
#[derive(Clone, Debug, Default)]
pub struct SlideList {
    items: Vec<Slide>,
}

impl SlideList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `slide`, or replaces the slide with the same ID in place.
    ///
    /// Returns the replaced slide, if any.
    pub fn add(&mut self, slide: Slide) -> Option<Slide> {
        match self.position(slide.id()) {
            Some(pos) => Some(std::mem::replace(&mut self.items[pos], slide)),
            None => {
                self.items.push(slide);
                None
            }
        }
    }

    /// Removes the slide with the given ID.
    pub fn remove(&mut self, id: &SlideId) -> Option<Slide> {
        self.position(id).map(|pos| self.items.remove(pos))
    }

    /// Returns the slide with the given ID.
    pub fn get(&self, id: &SlideId) -> Option<&Slide> {
        self.items.iter().find(|s| s.id() == id)
    }

    /// Returns the slide with the given ID, mutably.
    pub fn get_mut(&mut self, id: &SlideId) -> Option<&mut Slide> {
        self.items.iter_mut().find(|s| s.id() == id)
    }

    /// Returns true if a slide with the given ID is present.
    pub fn contains(&self, id: &SlideId) -> bool {
        self.position(id).is_some()
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no slides.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slides in queue order.
    pub fn as_slice(&self) -> &[Slide] {
        &self.items
    }

    /// Iterates over the slides in queue order.
    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.items.iter()
    }

    /// Iterates mutably over the slides in queue order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Slide> {
        self.items.iter_mut()
    }

    /// IDs in queue order.
    pub fn ids(&self) -> Vec<SlideId> {
        self.items.iter().map(|s| s.id().clone()).collect()
    }

    /// Stable sort by ascending index. Slides with equal indices keep their
    /// relative order.
    pub fn sort_by_index(&mut self) {
        self.items.sort_by_key(Slide::index);
    }

    fn position(&self, id: &SlideId) -> Option<usize> {
        self.items.iter().position(|s| s.id() == id)
    }
}

impl<'a> IntoIterator for &'a SlideList {
    type Item = &'a Slide;
    type IntoIter = std::slice::Iter<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
