//! Directory error types with HTTP status code mapping.
//!
//! [`DirectoryError`] is the central error type of the crate. Storage
//! backends, the service layer and the HTTP handlers all return it; each
//! variant maps to a numeric code and an HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::PersonId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "person not found: 2b0a6f0e-8d0b-4a55-9a3e-2f1f3f5f9d11"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error enum shared by every layer.
///
/// # Error Code Ranges
///
/// | Range     | Category    | HTTP Status               |
/// |-----------|-------------|---------------------------|
/// | 1000–1999 | Validation  | 400 Bad Request           |
/// | 1004      | Upload size | 413 Payload Too Large     |
/// | 2000–2999 | Not Found   | 404 Not Found             |
/// | 3000–3999 | Server      | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Request validation failed (e.g. blank name).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Uploaded CSV has the wrong shape or contents.
    #[error("malformed csv file: {0}")]
    MalformedCsv(String),

    /// Text could not be parsed as a person identifier.
    #[error("malformed person id: {0}")]
    InvalidPersonId(String),

    /// Request body exceeds the configured upload limit.
    #[error("upload too large: {0}")]
    UploadTooLarge(String),

    /// No record exists for the given identifier.
    #[error("person not found: {0}")]
    PersonNotFound(PersonId),

    /// The storage backend failed (connectivity, serialization, bad data).
    #[error("storage error: {0}")]
    StorageError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DirectoryError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::MalformedCsv(_) => 1002,
            Self::InvalidPersonId(_) => 1003,
            Self::UploadTooLarge(_) => 1004,
            Self::PersonNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::StorageError(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::MalformedCsv(_) | Self::InvalidPersonId(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::UploadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::PersonNotFound(_) => StatusCode::NOT_FOUND,
            Self::StorageError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for the "no such record" condition.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::PersonNotFound(_))
    }

    /// Prefixes the message of a backend or internal failure with `context`.
    ///
    /// Client-facing variants pass through unchanged so that their HTTP
    /// mapping is preserved.
    #[must_use]
    pub fn context(self, context: &str) -> Self {
        match self {
            Self::StorageError(msg) => Self::StorageError(format!("{context}: {msg}")),
            Self::Internal(msg) => Self::Internal(format!("{context}: {msg}")),
            other => other,
        }
    }

    /// Builds a [`DirectoryError::StorageError`] from a backend error.
    pub(crate) fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        Self::StorageError(format!("{context}: {err}"))
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
