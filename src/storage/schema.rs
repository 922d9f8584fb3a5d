//! On-disk document shapes and limits.
//!
//! Each entity is one pretty-printed JSON document. The structs here are
//! the persisted mapping only; the in-memory [`Queue`](crate::Queue) and
//! [`Slide`](crate::Slide) types convert to and from them.
//!
//! # File Layout
//!
//! ```text
//! <queues_dir>/
//! ├── lobby.json        { "owner": "alice", "slides": ["<id>", ...] }
//! └── front-desk.json
//!
//! <slides_dir>/
//! ├── <id>.json         { "id", "owner", "index", "queue_name", "name",
//! └── ...                 "duration_ms", "markup", "enabled", "collaborators" }
//! ```
//!
//! Queue documents store slide IDs as plain strings: a single bad ID must
//! not make the whole queue unreadable, because `load(fix_errors)` prunes
//! such references one by one.

use serde::{Deserialize, Serialize};

/// Suffix of every document file.
pub const FILE_SUFFIX: &str = ".json";

/// Directory entries starting with this character are ignored.
pub const HIDDEN_PREFIX: char = '.';

/// Maximum slide markup size in bytes (64 KB).
pub const MAX_MARKUP_SIZE: usize = 64 * 1024;

/// Maximum slide duration (10 minutes).
pub const MAX_DURATION_MS: u64 = 10 * 60 * 1000;

/// Duration given to new slides.
pub const DEFAULT_DURATION_MS: u64 = 5000;

/// Maximum number of collaborators per slide.
pub const MAX_COLLABORATORS: usize = 32;

/// Persisted form of a queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDocument {
    /// Username of the owner.
    pub owner: String,

    /// Slide IDs in queue order.
    pub slides: Vec<String>,
}

/// Persisted form of a slide.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDocument {
    /// Slide ID; must match the file name.
    pub id: String,

    /// Username of the owner.
    pub owner: String,

    /// Playback position within the queue.
    pub index: usize,

    /// Queue this slide belongs to.
    pub queue_name: String,

    /// Display name.
    pub name: String,

    /// How long the slide is shown.
    pub duration_ms: u64,

    /// Slide markup.
    #[serde(default)]
    pub markup: String,

    /// Disabled slides stay in the queue but are skipped on playback.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Users allowed to edit besides the owner.
    #[serde(default)]
    pub collaborators: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_document_shape() {
        let doc = QueueDocument {
            owner: "alice".into(),
            slides: vec!["a".into(), "b".into()],
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "owner": "alice", "slides": ["a", "b"] })
        );
    }

    #[test]
    fn test_slide_document_defaults() {
        let doc: SlideDocument = serde_json::from_str(
            r#"{"id":"s1","owner":"bob","index":3,"queue_name":"q","name":"n","duration_ms":1000}"#,
        )
        .unwrap();
        assert!(doc.enabled);
        assert!(doc.markup.is_empty());
        assert!(doc.collaborators.is_empty());
        assert_eq!(doc.index, 3);
    }

    #[test]
    fn test_queue_document_missing_owner_rejected() {
        let result: Result<QueueDocument, _> = serde_json::from_str(r#"{"slides":[]}"#);
        assert!(result.is_err());
    }
}
