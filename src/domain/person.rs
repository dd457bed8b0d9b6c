//! The person record and its name rules.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PersonId;
use crate::error::DirectoryError;

/// Maximum accepted length of a person name, in characters.
pub const MAX_NAME_LEN: usize = 256;

/// A person record: an identifier and a display name.
///
/// Field order matters: it defines the column order of CSV exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Person {
    /// Identifier assigned by the storage backend.
    pub id: PersonId,
    /// Display name, never empty.
    pub name: String,
}

impl Person {
    /// CSV header row matching the serialized field names.
    pub const CSV_HEADER: [&'static str; 2] = ["id", "name"];

    /// Creates a person record.
    #[must_use]
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Validates a person name and returns it trimmed.
///
/// # Errors
///
/// Returns [`DirectoryError::InvalidRequest`] if the name is blank, holds
/// control characters (line breaks included), or is longer than
/// [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<String, DirectoryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DirectoryError::InvalidRequest(
            "name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(DirectoryError::InvalidRequest(
            "name must not contain control characters".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DirectoryError::InvalidRequest(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_valid_name() {
        assert_eq!(validate_name("  Alice ").ok().as_deref(), Some("Alice"));
    }

    #[test]
    fn rejects_blank_name() {
        assert!(matches!(
            validate_name("   "),
            Err(DirectoryError::InvalidRequest(_))
        ));
    }

    #[test]
    fn rejects_overlong_name() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_name(&name).is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn rejects_line_breaks_and_control_characters() {
        for name in ["Alice\nBob", "Alice\r\nBob", "Al\tice", "Bob\u{7f}"] {
            assert!(
                matches!(validate_name(name), Err(DirectoryError::InvalidRequest(_))),
                "{name:?} accepted"
            );
        }
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let name = "é".repeat(MAX_NAME_LEN);
        assert!(validate_name(&name).is_ok());
    }
}
