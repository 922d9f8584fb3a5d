//! Slide index maintenance for queues.
//!
//! Both operations persist every index they change, one slide file at a
//! time. See the [module docs](super) for what that means for concurrent
//! readers.

use tracing::{debug, instrument};

use super::Queue;
use crate::error::{NotFoundError, Result};
use crate::slide::Slide;
use crate::types::SlideId;

impl Queue {
    /// Renumbers the slides `0..len` in index order and writes each slide.
    ///
    /// The sort is stable: slides sharing an index keep their current
    /// relative order. Afterwards indices have no gaps or duplicates and the
    /// in-memory order matches them. The queue file itself is not written.
    #[instrument(skip(self), fields(queue = %self.name, slides = self.slides.len()))]
    pub fn normalize(&mut self) -> Result<()> {
        self.slides.sort_by_index();
        for (i, slide) in self.slides.iter_mut().enumerate() {
            slide.set_index(i);
            slide.write()?;
        }
        debug!("Queue normalized");
        Ok(())
    }

    /// Moves the slide `keep_id` to the position given by its own index,
    /// shifting the others out of its way, then normalizes.
    ///
    /// Typical use: set a slide's index to where it should go, write it, and
    /// juggle. An index past the end appends the slide.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` before touching anything if `keep_id` is not in
    /// the queue. Write failures abort the pass; the slide stays a member.
    #[instrument(skip(self, keep_id), fields(queue = %self.name, slide = %keep_id))]
    pub fn juggle(&mut self, keep_id: &SlideId) -> Result<()> {
        let mut keep = self
            .slides
            .remove(keep_id)
            .ok_or_else(|| NotFoundError::slide_not_in_queue(&self.name, keep_id))?;

        let opened = self.open_slot(&mut keep);
        self.slides.add(keep);
        opened?;

        self.normalize()
    }

    /// Normalizes the other slides and shifts every slide at or after
    /// `keep`'s index up by one. If nothing sat at that index, `keep` is
    /// moved to the end instead.
    fn open_slot(&mut self, keep: &mut Slide) -> Result<()> {
        self.normalize()?;

        let keep_i = keep.index();
        let mut clash = false;
        for slide in self.slides.iter_mut() {
            let i = slide.index();
            if i >= keep_i {
                clash |= i == keep_i;
                slide.set_index(i + 1);
                slide.write()?;
            }
        }

        if !clash {
            keep.set_index(self.slides.len());
            keep.write()?;
        }

        debug!(keep_i, clash, "Slot opened");
        Ok(())
    }
}
