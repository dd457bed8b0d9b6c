//! Type-safe person identifier.
//!
//! [`PersonId`] is a newtype wrapper around [`uuid::Uuid`] (v4). Every
//! storage backend uses the same representation, so identifiers move
//! between backends and CSV files unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DirectoryError;

/// Unique identifier for a person record.
///
/// Generated by the storage backend when the record is added and never
/// changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct PersonId(uuid::Uuid);

impl PersonId {
    /// Creates a new random `PersonId` (UUID v4).
    ///
    /// Every call yields a distinct id, so there is no `Default`.
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `PersonId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PersonId {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| DirectoryError::InvalidPersonId(format!("{s:?}: {e}")))
    }
}

impl From<PersonId> for uuid::Uuid {
    fn from(id: PersonId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        assert_ne!(PersonId::new(), PersonId::new());
    }

    #[test]
    fn parses_hyphenated_form() {
        let id = PersonId::new();
        let Ok(parsed) = id.to_string().parse::<PersonId>() else {
            panic!("display output must parse back");
        };
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_tolerates_surrounding_whitespace() {
        let id = PersonId::new();
        let padded = format!("  {id} ");
        assert_eq!(padded.parse::<PersonId>().ok(), Some(id));
    }

    #[test]
    fn rejects_garbage() {
        let result = "1".parse::<PersonId>();
        assert!(matches!(result, Err(DirectoryError::InvalidPersonId(_))));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = PersonId::new();
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, format!("\"{id}\""));
    }
}
