//! Domain layer: the person record and its identifier.

pub mod person;
pub mod person_id;

pub use person::{Person, validate_name};
pub use person_id::PersonId;
