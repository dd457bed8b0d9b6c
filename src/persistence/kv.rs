//! Redis key-value storage backend.
//!
//! Each person is stored under the string key `person:<uuid>` with the
//! JSON-serialized [`Person`] as value. Listing scans the `person:*`
//! keyspace and rebuilds every record's id from its key suffix.

use std::fmt;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ExistenceCheck, SetOptions};

use super::PersonStorage;
use crate::domain::{Person, PersonId};
use crate::error::DirectoryError;

/// Prefix shared by all person keys.
pub const KEY_PREFIX: &str = "person:";

/// Number of keys requested per `SCAN` round trip.
const SCAN_BATCH: usize = 200;

/// Redis-backed person store.
///
/// Holds a reconnecting [`ConnectionManager`]; clones of it share the
/// same multiplexed connection.
#[derive(Clone)]
pub struct RedisStorage {
    conn: ConnectionManager,
}

impl fmt::Debug for RedisStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStorage").finish_non_exhaustive()
    }
}

impl RedisStorage {
    /// Opens a managed connection to the Redis server at `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError::StorageError`] if the URL is invalid or
    /// the server cannot be reached.
    pub async fn connect(url: &str) -> Result<Self, DirectoryError> {
        let client = redis::Client::open(url)
            .map_err(|e| DirectoryError::storage("invalid redis url", e))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| DirectoryError::storage("failed to connect to redis", e))?;
        Ok(Self { conn })
    }

    /// Scans the keyspace for every person key.
    async fn scan_keys(&self) -> Result<Vec<String>, DirectoryError> {
        let mut conn = self.conn.clone();
        let pattern = format!("{KEY_PREFIX}*");
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| DirectoryError::storage("failed to scan persons", e))?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        // SCAN may return a key more than once.
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }
}

/// Returns the storage key for `id`.
#[must_use]
pub fn person_key(id: PersonId) -> String {
    format!("{KEY_PREFIX}{id}")
}

/// Rebuilds the identifier from a storage key.
///
/// # Errors
///
/// Returns a [`DirectoryError::StorageError`] if the key lacks the prefix
/// or its suffix is not a UUID.
pub fn id_from_key(key: &str) -> Result<PersonId, DirectoryError> {
    let suffix = key
        .strip_prefix(KEY_PREFIX)
        .ok_or_else(|| DirectoryError::StorageError(format!("unexpected key {key:?}")))?;
    suffix
        .parse()
        .map_err(|e| DirectoryError::storage(&format!("malformed id in key {key:?}"), e))
}

fn encode(person: &Person) -> Result<String, DirectoryError> {
    serde_json::to_string(person).map_err(|e| DirectoryError::storage("cannot encode person", e))
}

/// Decodes a stored value; the key, not the payload, is authoritative for
/// the id.
fn decode(id: PersonId, raw: &str) -> Result<Person, DirectoryError> {
    let mut person: Person = serde_json::from_str(raw)
        .map_err(|e| DirectoryError::storage(&format!("cannot decode person {id}"), e))?;
    person.id = id;
    Ok(person)
}

#[async_trait]
impl PersonStorage for RedisStorage {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn add_person(&self, name: &str) -> Result<PersonId, DirectoryError> {
        let mut conn = self.conn.clone();
        let id = PersonId::new();
        let value = encode(&Person::new(id, name))?;
        let opts = SetOptions::default().conditional_set(ExistenceCheck::NX);
        let reply: Option<String> = conn
            .set_options(person_key(id), value, opts)
            .await
            .map_err(|e| DirectoryError::storage("failed to add person", e))?;
        if reply.is_none() {
            return Err(DirectoryError::Internal(format!(
                "person {id} already exists"
            )));
        }
        Ok(id)
    }

    async fn get_person(&self, id: PersonId) -> Result<Person, DirectoryError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(person_key(id))
            .await
            .map_err(|e| DirectoryError::storage(&format!("failed to get person {id}"), e))?;
        let raw = raw.ok_or(DirectoryError::PersonNotFound(id))?;
        decode(id, &raw)
    }

    async fn get_all_persons(&self) -> Result<Vec<Person>, DirectoryError> {
        let keys = self.scan_keys().await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();
        let values: Vec<Option<String>> = conn
            .mget(&keys)
            .await
            .map_err(|e| DirectoryError::storage("failed to fetch persons", e))?;

        let mut persons = Vec::with_capacity(keys.len());
        for (key, value) in keys.iter().zip(values) {
            // Deleted between SCAN and MGET.
            let Some(raw) = value else {
                continue;
            };
            persons.push(decode(id_from_key(key)?, &raw)?);
        }
        Ok(persons)
    }

    async fn update_person(&self, id: PersonId, person: &Person) -> Result<(), DirectoryError> {
        let mut conn = self.conn.clone();
        let value = encode(&Person::new(id, person.name.as_str()))?;
        let opts = SetOptions::default().conditional_set(ExistenceCheck::XX);
        let reply: Option<String> = conn
            .set_options(person_key(id), value, opts)
            .await
            .map_err(|e| DirectoryError::storage(&format!("failed to update person {id}"), e))?;
        reply.map(|_| ()).ok_or(DirectoryError::PersonNotFound(id))
    }

    async fn delete_person(&self, id: PersonId) -> Result<(), DirectoryError> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn
            .del(person_key(id))
            .await
            .map_err(|e| DirectoryError::storage(&format!("failed to delete person {id}"), e))?;
        if removed == 0 {
            return Err(DirectoryError::PersonNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn key_layout_is_prefixed_uuid() {
        let id = PersonId::new();
        assert_eq!(person_key(id), format!("person:{id}"));
    }

    #[test]
    fn id_round_trips_through_key() {
        let id = PersonId::new();
        let Ok(parsed) = id_from_key(&person_key(id)) else {
            panic!("key should parse");
        };
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_foreign_or_malformed_keys() {
        assert!(matches!(
            id_from_key("user:1"),
            Err(DirectoryError::StorageError(_))
        ));
        assert!(matches!(
            id_from_key("person:42"),
            Err(DirectoryError::StorageError(_))
        ));
    }

    #[test]
    fn decode_prefers_key_id_over_payload() {
        let stored = Person::new(PersonId::new(), "Alice");
        let Ok(raw) = encode(&stored) else {
            panic!("encode failed");
        };
        let key_id = PersonId::new();
        let Ok(person) = decode(key_id, &raw) else {
            panic!("decode failed");
        };
        assert_eq!(person, Person::new(key_id, "Alice"));
    }

    #[test]
    fn decode_reports_garbage_as_storage_error() {
        let result = decode(PersonId::new(), "{not json");
        assert!(matches!(result, Err(DirectoryError::StorageError(_))));
    }
}
