//! PostgreSQL implementation of the storage contract.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::PersonStorage;
use crate::config::DirectoryConfig;
use crate::domain::{Person, PersonId};
use crate::error::DirectoryError;

/// PostgreSQL-backed person store using `sqlx::PgPool`.
///
/// Records live in the `persons` table created by the embedded migrations.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config` and applies pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError::StorageError`] if the database cannot be
    /// reached or a migration fails.
    pub async fn connect(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| DirectoryError::storage("failed to connect to postgres", e))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| DirectoryError::storage("failed to run migrations", e))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl PersonStorage for PostgresStorage {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn add_person(&self, name: &str) -> Result<PersonId, DirectoryError> {
        let id = PersonId::new();
        // Primary key violation surfaces as an error, never an overwrite.
        sqlx::query("INSERT INTO persons (id, name) VALUES ($1, $2)")
            .bind(Uuid::from(id))
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| DirectoryError::storage("failed to add person", e))?;
        Ok(id)
    }

    async fn get_person(&self, id: PersonId) -> Result<Person, DirectoryError> {
        let row = sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM persons WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DirectoryError::storage(&format!("failed to get person {id}"), e))?;

        row.map(|(id, name)| Person::new(PersonId::from_uuid(id), name))
            .ok_or(DirectoryError::PersonNotFound(id))
    }

    async fn get_all_persons(&self) -> Result<Vec<Person>, DirectoryError> {
        let rows =
            sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM persons ORDER BY name, id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DirectoryError::storage("failed to fetch persons", e))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Person::new(PersonId::from_uuid(id), name))
            .collect())
    }

    async fn update_person(&self, id: PersonId, person: &Person) -> Result<(), DirectoryError> {
        let result = sqlx::query("UPDATE persons SET name = $2 WHERE id = $1")
            .bind(Uuid::from(id))
            .bind(&person.name)
            .execute(&self.pool)
            .await
            .map_err(|e| DirectoryError::storage(&format!("failed to update person {id}"), e))?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::PersonNotFound(id));
        }
        Ok(())
    }

    async fn delete_person(&self, id: PersonId) -> Result<(), DirectoryError> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(|e| DirectoryError::storage(&format!("failed to delete person {id}"), e))?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::PersonNotFound(id));
        }
        Ok(())
    }
}
