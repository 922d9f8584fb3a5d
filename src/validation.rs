//! Name and identifier validation.
//!
//! Queue names, usernames and slide IDs all end up in file paths or in
//! documents that other requests read back, so they share one allow-list
//! rule:
//!
//! | Check | Error |
//! |-------|-------|
//! | non-empty | [`ValidationError::RequiredField`] |
//! | length ≤ max | [`ValidationError::TooLong`] |
//! | only `[A-Za-z0-9_-]` | [`ValidationError::InvalidCharacters`] |
//!
//! Checks run in that order, so an over-long name with bad characters
//! reports the length first. Lengths are counted in bytes.

use crate::config::Config;
use crate::error::ValidationError;

/// Maximum length of a slide ID.
pub const SLIDE_ID_MAX_LEN: usize = 64;

/// Returns true if `c` may appear in a name or identifier.
#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Validates `value` against the shared name rule.
///
/// `field` is only used to label the error.
pub fn validate_name(value: &str, max_len: usize, field: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::required_field(field));
    }

    if value.len() > max_len {
        return Err(ValidationError::too_long(field, value.len(), max_len));
    }

    if !value.chars().all(is_name_char) {
        return Err(ValidationError::invalid_characters(field, value));
    }

    Ok(())
}

/// Validates a queue name against the configured maximum length.
pub fn validate_queue_name(config: &Config, name: &str) -> Result<(), ValidationError> {
    validate_name(name, config.queue_name_max_len, "queue name")
}

/// Validates a username (queue owner, slide owner, collaborator).
pub fn validate_username(config: &Config, name: &str) -> Result<(), ValidationError> {
    validate_name(name, config.username_max_len, "username")
}

/// Validates a slide ID.
pub fn validate_slide_id(id: &str) -> Result<(), ValidationError> {
    validate_name(id, SLIDE_ID_MAX_LEN, "slide id")
}
