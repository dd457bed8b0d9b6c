//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; `/health` sits at the
//! root.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
///
/// `max_upload_bytes` caps the body size of CSV imports.
pub fn build_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes(max_upload_bytes))
        .merge(handlers::system::routes())
}
