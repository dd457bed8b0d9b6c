//! # person-directory
//!
//! A person-record directory served over HTTP. Records are kept in one of
//! several interchangeable storage backends (in-memory, Redis, PostgreSQL)
//! and can be bulk imported from and exported to CSV.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── PersonService (service/)
//!     │     └── CSV reconciliation
//!     │
//!     └── PersonStorage (persistence/)
//!           ├── InMemoryStorage
//!           ├── RedisStorage
//!           └── PostgresStorage
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
