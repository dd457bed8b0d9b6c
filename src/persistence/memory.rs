//! In-memory storage backend.
//!
//! [`InMemoryStorage`] keeps every record in a `HashMap` behind a
//! [`tokio::sync::RwLock`], so concurrent requests read in parallel and
//! writes are serialized. Contents are lost when the process exits.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::PersonStorage;
use crate::domain::{Person, PersonId};
use crate::error::DirectoryError;

/// Process-local person store.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    persons: RwLock<HashMap<PersonId, Person>>,
}

impl InMemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.persons.read().await.len()
    }

    /// Returns `true` if the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.persons.read().await.is_empty()
    }
}

#[async_trait]
impl PersonStorage for InMemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn add_person(&self, name: &str) -> Result<PersonId, DirectoryError> {
        let id = PersonId::new();
        let mut map = self.persons.write().await;
        if map.contains_key(&id) {
            // Should never happen with UUID v4.
            return Err(DirectoryError::Internal(format!(
                "person {id} already exists"
            )));
        }
        map.insert(id, Person::new(id, name));
        Ok(id)
    }

    async fn get_person(&self, id: PersonId) -> Result<Person, DirectoryError> {
        let map = self.persons.read().await;
        map.get(&id)
            .cloned()
            .ok_or(DirectoryError::PersonNotFound(id))
    }

    async fn get_all_persons(&self) -> Result<Vec<Person>, DirectoryError> {
        let map = self.persons.read().await;
        Ok(map.values().cloned().collect())
    }

    async fn update_person(&self, id: PersonId, person: &Person) -> Result<(), DirectoryError> {
        let mut map = self.persons.write().await;
        let entry = map.get_mut(&id).ok_or(DirectoryError::PersonNotFound(id))?;
        entry.name.clone_from(&person.name);
        Ok(())
    }

    async fn delete_person(&self, id: PersonId) -> Result<(), DirectoryError> {
        let mut map = self.persons.write().await;
        map.remove(&id)
            .map(|_| ())
            .ok_or(DirectoryError::PersonNotFound(id))
    }
}
