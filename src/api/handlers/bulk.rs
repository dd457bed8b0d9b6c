//! CSV bulk import and export handlers.

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::CsvUploadForm;
use crate::app_state::AppState;
use crate::error::{DirectoryError, ErrorResponse};
use crate::service::CsvImportReport;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// `POST /persons/import` — Reconcile an uploaded CSV file.
///
/// # Errors
///
/// Returns [`DirectoryError::MalformedCsv`] if the upload is missing or the
/// file is invalid, and [`DirectoryError::UploadTooLarge`] if the body
/// exceeds the configured limit.
#[utoipa::path(
    post,
    path = "/api/v1/persons/import",
    tag = "CSV",
    summary = "Import persons from CSV",
    description = "Upload an `id,name` CSV as multipart field `file`. Rows with a known id update that person; rows with an unknown id are inserted with a new id. A malformed file is rejected before any change is made.",
    request_body(content = CsvUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import applied", body = CsvImportReport),
        (status = 400, description = "Malformed file", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the size limit", body = ErrorResponse),
    )
)]
pub async fn import_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, DirectoryError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() == Some(FILE_FIELD) {
            let data = field.bytes().await.map_err(upload_error)?;
            upload = Some(data);
            break;
        }
    }

    let data = upload.ok_or_else(|| {
        DirectoryError::MalformedCsv(format!("missing multipart field {FILE_FIELD:?}"))
    })?;
    tracing::debug!(bytes = data.len(), "csv upload received");

    let report = state.person_service.process_csv(&data).await?;
    Ok(Json(report))
}

/// Maps a multipart read failure, keeping the body-limit rejection as 413.
fn upload_error(err: MultipartError) -> DirectoryError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        DirectoryError::UploadTooLarge(err.body_text())
    } else {
        DirectoryError::MalformedCsv(format!("cannot read upload: {}", err.body_text()))
    }
}

/// `GET /persons/export` — Download all persons as CSV.
///
/// # Errors
///
/// Returns [`DirectoryError::StorageError`] if the backend fails.
#[utoipa::path(
    get,
    path = "/api/v1/persons/export",
    tag = "CSV",
    summary = "Export persons as CSV",
    description = "Returns every stored person as an `id,name` CSV attachment.",
    responses(
        (status = 200, description = "CSV file", body = String, content_type = "text/csv"),
    )
)]
pub async fn export_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DirectoryError> {
    let body = state.person_service.download_persons_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"persons.csv\"",
            ),
        ],
        body,
    ))
}

/// CSV routes. Uploads larger than `max_upload_bytes` are rejected.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/persons/import",
            post(import_csv).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/persons/export", get(export_csv))
}
