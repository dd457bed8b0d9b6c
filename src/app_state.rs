//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::PersonService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Person service for all business logic.
    pub person_service: Arc<PersonService>,
}

impl AppState {
    /// Wraps `person_service` for sharing across handlers.
    #[must_use]
    pub fn new(person_service: PersonService) -> Self {
        Self {
            person_service: Arc::new(person_service),
        }
    }
}
