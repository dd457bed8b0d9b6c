//! Persistence layer: the storage contract and its backends.
//!
//! [`PersonStorage`] is the capability set every backend implements. The
//! service layer only ever sees `Arc<dyn PersonStorage>`; which backend
//! sits behind it is decided once at startup from
//! [`crate::config::StorageBackendKind`].
//!
//! ```text
//!                PersonStorage
//!       ┌──────────────┼───────────────┐
//! InMemoryStorage  RedisStorage  PostgresStorage
//!   (HashMap)     ("person:<id>")  (persons table)
//! ```

pub mod kv;
pub mod memory;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

pub use kv::RedisStorage;
pub use memory::InMemoryStorage;
pub use postgres::PostgresStorage;

use crate::config::{DirectoryConfig, StorageBackendKind};
use crate::domain::{Person, PersonId};
use crate::error::DirectoryError;

/// Storage contract for person records.
///
/// Implementations own identifier generation and must report a missing
/// record as [`DirectoryError::PersonNotFound`] from `get_person`,
/// `update_person` and `delete_person`. Backend failures are reported as
/// [`DirectoryError::StorageError`]; nothing is retried.
#[async_trait]
pub trait PersonStorage: Send + Sync + fmt::Debug {
    /// Short backend name used in logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Persists a new record under a freshly generated identifier.
    ///
    /// Never overwrites an existing record.
    async fn add_person(&self, name: &str) -> Result<PersonId, DirectoryError>;

    /// Loads the record stored under `id`.
    async fn get_person(&self, id: PersonId) -> Result<Person, DirectoryError>;

    /// Loads every record. Ordering is backend-specific.
    async fn get_all_persons(&self) -> Result<Vec<Person>, DirectoryError>;

    /// Replaces the name of an existing record. The stored id is always
    /// `id`, whatever `person.id` holds.
    async fn update_person(&self, id: PersonId, person: &Person) -> Result<(), DirectoryError>;

    /// Removes the record stored under `id`.
    async fn delete_person(&self, id: PersonId) -> Result<(), DirectoryError>;
}

/// Connects the backend selected in `config`.
///
/// # Errors
///
/// Returns a [`DirectoryError::StorageError`] if the Redis or PostgreSQL
/// backend cannot be reached or migrated.
pub async fn connect(config: &DirectoryConfig) -> Result<Arc<dyn PersonStorage>, DirectoryError> {
    let storage: Arc<dyn PersonStorage> = match config.storage_backend {
        StorageBackendKind::Memory => Arc::new(InMemoryStorage::new()),
        StorageBackendKind::Redis => Arc::new(RedisStorage::connect(&config.redis_url).await?),
        StorageBackendKind::Postgres => Arc::new(PostgresStorage::connect(config).await?),
    };
    tracing::info!(backend = storage.backend_name(), "storage backend ready");
    Ok(storage)
}
