//! Person-related DTOs for create, update and import operations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::PersonId;

/// Request body for `POST /persons` and `PUT /persons/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PersonRequest {
    /// Display name; surrounding whitespace is trimmed.
    pub name: String,
}

/// Response body for `POST /persons` (201 Created).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePersonResponse {
    /// Identifier generated by the storage backend.
    pub id: PersonId,
}

/// Multipart form accepted by `POST /persons/import`.
#[derive(Debug, ToSchema)]
pub struct CsvUploadForm {
    /// CSV file with an `id,name` header row.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
