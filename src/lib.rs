//! # Signage Store
//!
//! File-backed storage core for a digital-signage backend.
//!
//! Users own **queues** (ordered slide playlists) and **slides** (units of
//! content). There is no database: each queue and each slide is a JSON file,
//! and every read or write of one of those files happens under an exclusive
//! advisory lock.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use signage::{Config, NewSlide, Signage};
//!
//! // Open (and create) ./data/{queues,slides}
//! let store = Signage::open(Config::default())?;
//!
//! // A queue for the lobby screen
//! store.create_queue("lobby", "alice")?;
//!
//! // Two slides; the second goes first
//! let welcome = store.add_slide("lobby", NewSlide {
//!     owner: "alice".to_string(),
//!     markup: "[h1]Welcome[/h1]".to_string(),
//!     ..Default::default()
//! })?;
//! store.add_slide("lobby", NewSlide {
//!     owner: "alice".to_string(),
//!     index: Some(0),
//!     ..Default::default()
//! })?;
//!
//! let queue = store.queue("lobby")?;
//! assert_eq!(queue.slides()[1].id(), welcome.id());
//! ```
//!
//! ## Key Concepts
//!
//! ### Queue
//!
//! A **queue** is a named, owned, ordered list of slide references. Its file
//! holds only the owner and the slide IDs; see [`Queue`].
//!
//! ### Ordering
//!
//! Every slide carries an `index`. [`Queue::normalize`] renumbers a queue to
//! `0..len` and [`Queue::juggle`] moves one slide to its own index while
//! shifting the rest out of the way.
//!
//! ### Self-healing loads
//!
//! `Queue::load(true)` drops references to slides that are missing or
//! damaged and writes the cleaned queue back.
//!
//! ## Consistency
//!
//! Locks cover one file at a time. Multi-file operations (normalize, juggle,
//! cascading removal) can be observed half-done by a concurrent reader; there
//! is no transaction spanning a queue and its slides.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod config;
mod error;
mod signage;
mod types;

pub mod storage;
pub mod validation;

// Domain modules
pub mod queue;
pub mod slide;

// ============================================================================
// Public API re-exports
// ============================================================================

// Main store interface
pub use signage::Signage;

// Configuration
pub use config::{
    Config, DEFAULT_LOCK_TIMEOUT, DEFAULT_QUEUE_NAME_MAX_LEN, DEFAULT_USERNAME_MAX_LEN,
};

// Error handling
pub use error::{ErrorKind, NotFoundError, Result, SignageError, StorageError, ValidationError};

// Core types
pub use types::SlideId;

// Domain types
pub use queue::{Queue, QueueExport, SlideList};
pub use slide::{NewSlide, Slide, SlideExport};

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common usage.
///
/// ```rust
/// use signage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{ErrorKind, Result, SignageError};
    pub use crate::queue::Queue;
    pub use crate::signage::Signage;
    pub use crate::slide::{NewSlide, Slide};
    pub use crate::types::SlideId;
}
