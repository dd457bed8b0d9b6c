//! Person CRUD handlers: create, list, get, update, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreatePersonResponse, PersonRequest};
use crate::app_state::AppState;
use crate::domain::{Person, PersonId};
use crate::error::{DirectoryError, ErrorResponse};

/// `POST /persons` — Create a person.
///
/// # Errors
///
/// Returns [`DirectoryError::InvalidRequest`] for a blank name.
#[utoipa::path(
    post,
    path = "/api/v1/persons",
    tag = "Persons",
    summary = "Create a person",
    description = "Stores a new person and returns the identifier generated by the storage backend.",
    request_body = PersonRequest,
    responses(
        (status = 201, description = "Person created", body = CreatePersonResponse),
        (status = 400, description = "Invalid name", body = ErrorResponse),
    )
)]
pub async fn create_person(
    State(state): State<AppState>,
    Json(req): Json<PersonRequest>,
) -> Result<impl IntoResponse, DirectoryError> {
    let id = state.person_service.add_person(&req.name).await?;
    Ok((StatusCode::CREATED, Json(CreatePersonResponse { id })))
}

/// `GET /persons` — List all persons.
///
/// # Errors
///
/// Returns [`DirectoryError::StorageError`] if the backend fails.
#[utoipa::path(
    get,
    path = "/api/v1/persons",
    tag = "Persons",
    summary = "List persons",
    description = "Returns every stored person. Ordering depends on the storage backend.",
    responses(
        (status = 200, description = "All persons", body = Vec<Person>),
    )
)]
pub async fn list_persons(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DirectoryError> {
    let persons = state.person_service.get_all_persons().await?;
    Ok(Json(persons))
}

/// `GET /persons/{id}` — Get a single person.
///
/// # Errors
///
/// Returns [`DirectoryError::PersonNotFound`] if the person does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/persons/{id}",
    tag = "Persons",
    summary = "Get a person",
    params(
        ("id" = uuid::Uuid, Path, description = "Person UUID"),
    ),
    responses(
        (status = 200, description = "Person found", body = Person),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
    )
)]
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DirectoryError> {
    let id: PersonId = id.parse()?;
    let person = state.person_service.get_person(id).await?;
    Ok(Json(person))
}

/// `PUT /persons/{id}` — Rename a person.
///
/// # Errors
///
/// Returns [`DirectoryError::PersonNotFound`] if the person does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/persons/{id}",
    tag = "Persons",
    summary = "Update a person",
    description = "Replaces the name of an existing person. The identifier never changes.",
    params(
        ("id" = uuid::Uuid, Path, description = "Person UUID"),
    ),
    request_body = PersonRequest,
    responses(
        (status = 204, description = "Person updated"),
        (status = 400, description = "Malformed id or invalid name", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
    )
)]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PersonRequest>,
) -> Result<impl IntoResponse, DirectoryError> {
    let id: PersonId = id.parse()?;
    state.person_service.update_person(id, &req.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /persons/{id}` — Remove a person.
///
/// # Errors
///
/// Returns [`DirectoryError::PersonNotFound`] if the person does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/persons/{id}",
    tag = "Persons",
    summary = "Delete a person",
    params(
        ("id" = uuid::Uuid, Path, description = "Person UUID"),
    ),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
    )
)]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DirectoryError> {
    let id: PersonId = id.parse()?;
    state.person_service.delete_person(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Person management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/persons", post(create_person).get(list_persons))
        .route(
            "/persons/{id}",
            get(get_person).put(update_person).delete(delete_person),
        )
}
