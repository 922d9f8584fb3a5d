//! Configuration types for the signage store.
//!
//! The [`Config`] struct controls where queues and slides live on disk,
//! the name length limits, and how long file locks may be waited on.
//!
//! # Example
//! ```rust
//! use signage::Config;
//! use std::time::Duration;
//!
//! // Everything under ./data/{queues,slides}
//! let config = Config::default();
//!
//! // Rooted elsewhere, waiting forever for file locks
//! let config = Config {
//!     lock_timeout: None,
//!     ..Config::with_root("/srv/signage")
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ValidationError;

/// Default maximum length of a queue name.
pub const DEFAULT_QUEUE_NAME_MAX_LEN: usize = 32;

/// Default maximum length of a username.
pub const DEFAULT_USERNAME_MAX_LEN: usize = 64;

/// Default time to wait for an exclusive file lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Store configuration options.
///
/// All fields have sensible defaults. Use struct update syntax to override
/// specific settings:
///
/// ```rust
/// use signage::Config;
///
/// let config = Config {
///     queue_name_max_len: 64,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding one `<name>.json` document per queue.
    pub queues_dir: PathBuf,

    /// Directory holding one `<id>.json` document per slide.
    pub slides_dir: PathBuf,

    /// Maximum length of a queue name (and of a slide's display name).
    ///
    /// Default: 32
    pub queue_name_max_len: usize,

    /// Maximum length of a username (queue and slide owners, collaborators).
    ///
    /// Default: 64
    pub username_max_len: usize,

    /// How long a read or write waits for the exclusive file lock.
    ///
    /// `None` blocks until the lock is granted. `Some(d)` gives up after `d`
    /// with a lock timeout error.
    /// Default: 10 seconds
    pub lock_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_root(".")
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Config that keeps its data under `<root>/data`.
    ///
    /// # Example
    /// ```rust
    /// use signage::Config;
    /// use std::path::Path;
    ///
    /// let config = Config::with_root("/srv/signage");
    /// assert_eq!(config.queues_dir, Path::new("/srv/signage/data/queues"));
    /// assert_eq!(config.slides_dir, Path::new("/srv/signage/data/slides"));
    /// ```
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let data = root.as_ref().join("data");
        Self {
            queues_dir: data.join("queues"),
            slides_dir: data.join("slides"),
            queue_name_max_len: DEFAULT_QUEUE_NAME_MAX_LEN,
            username_max_len: DEFAULT_USERNAME_MAX_LEN,
            lock_timeout: Some(DEFAULT_LOCK_TIMEOUT),
        }
    }

    /// Validates the configuration.
    ///
    /// Called automatically by [`Signage::open()`](crate::Signage::open).
    ///
    /// # Errors
    /// Returns `ValidationError` if:
    /// - either length limit is 0
    /// - either directory is empty
    /// - queues and slides share a directory
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.queue_name_max_len == 0 {
            return Err(ValidationError::invalid_field(
                "queue_name_max_len",
                "must be greater than 0",
            ));
        }

        if self.username_max_len == 0 {
            return Err(ValidationError::invalid_field(
                "username_max_len",
                "must be greater than 0",
            ));
        }

        if self.queues_dir.as_os_str().is_empty() {
            return Err(ValidationError::required_field("queues_dir"));
        }

        if self.slides_dir.as_os_str().is_empty() {
            return Err(ValidationError::required_field("slides_dir"));
        }

        // Listing queues enumerates every *.json in queues_dir
        if self.queues_dir == self.slides_dir {
            return Err(ValidationError::invalid_field(
                "slides_dir",
                "must differ from queues_dir",
            ));
        }

        Ok(())
    }

    /// Returns the file path of the queue called `name`.
    ///
    /// The name must already have passed queue-name validation.
    pub(crate) fn queue_path(&self, name: &str) -> PathBuf {
        self.queues_dir.join(format!("{name}.json"))
    }

    /// Returns the file path of the slide with the given ID.
    ///
    /// The ID must already have passed slide-id validation.
    pub(crate) fn slide_path(&self, id: &str) -> PathBuf {
        self.slides_dir.join(format!("{id}.json"))
    }
}
