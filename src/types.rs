//! Core type definitions for identifiers.
//!
//! Slide IDs double as file names, so a [`SlideId`] can only be built from
//! a string that passes [`validate_slide_id`](crate::validation::validate_slide_id).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::validation::validate_slide_id;

/// Slide identifier.
///
/// Freshly generated IDs are UUID v7 (time-ordered) rendered as 32 lowercase
/// hex characters. IDs read from disk or supplied by callers may be any
/// string accepted by the slide-id rule.
///
/// # Example
/// ```
/// use signage::SlideId;
///
/// let id = SlideId::new();
/// assert_eq!(id.as_str().len(), 32);
///
/// let parsed: SlideId = "intro-1".parse().unwrap();
/// assert_eq!(parsed.as_str(), "intro-1");
///
/// assert!("../escape".parse::<SlideId>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlideId(String);

impl SlideId {
    /// Creates a new SlideId from a UUID v7.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Parses and validates a slide ID.
    pub fn parse(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_slide_id(&id)?;
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SlideId {
    /// Returns a freshly generated SlideId.
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SlideId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SlideId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SlideId> for String {
    fn from(id: SlideId) -> Self {
        id.0
    }
}

impl AsRef<str> for SlideId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
