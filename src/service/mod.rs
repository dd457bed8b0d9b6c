//! Service layer: business logic orchestration.
//!
//! [`PersonService`] validates input, checks record existence before
//! mutations, and runs CSV import/export on top of a
//! [`crate::persistence::PersonStorage`] backend.

pub mod csv_codec;
pub mod person_service;

pub use person_service::{CsvImportReport, PersonService};
