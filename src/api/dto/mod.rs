//! Data Transfer Objects for REST request/response serialization.

pub mod person_dto;

pub use person_dto::*;
