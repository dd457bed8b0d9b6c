//! REST endpoint handlers organized by resource.

pub mod bulk;
pub mod person;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(person::routes())
        .merge(bulk::routes(max_upload_bytes))
}
