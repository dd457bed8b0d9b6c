//! Person service: validation, existence checks and CSV reconciliation.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::csv_codec;
use crate::domain::{Person, PersonId, validate_name};
use crate::error::DirectoryError;
use crate::persistence::PersonStorage;

/// Outcome of a CSV import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CsvImportReport {
    /// Rows whose id matched an existing record and were updated in place.
    pub updated: usize,
    /// Rows whose id was unknown and were inserted as new records.
    pub inserted: usize,
}

/// Orchestration layer for all person operations.
///
/// Stateless coordinator over an `Arc<dyn PersonStorage>`. Mutations of an
/// existing record first confirm the record exists, so a missing id is
/// always reported as [`DirectoryError::PersonNotFound`].
#[derive(Debug, Clone)]
pub struct PersonService {
    storage: Arc<dyn PersonStorage>,
}

impl PersonService {
    /// Creates a new `PersonService`.
    #[must_use]
    pub fn new(storage: Arc<dyn PersonStorage>) -> Self {
        Self { storage }
    }

    /// Name of the storage backend in use.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.storage.backend_name()
    }

    /// Adds a new person and returns its generated id.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidRequest`] for an invalid name, or the
    /// backend's error.
    pub async fn add_person(&self, name: &str) -> Result<PersonId, DirectoryError> {
        let name = validate_name(name)?;
        let person_id = self.storage.add_person(&name).await?;
        tracing::info!(%person_id, "person added");
        Ok(person_id)
    }

    /// Returns the person stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::PersonNotFound`] if there is no such record.
    pub async fn get_person(&self, id: PersonId) -> Result<Person, DirectoryError> {
        self.storage.get_person(id).await
    }

    /// Returns every stored person.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the records cannot be loaded.
    pub async fn get_all_persons(&self) -> Result<Vec<Person>, DirectoryError> {
        self.storage.get_all_persons().await
    }

    /// Replaces the name of an existing person.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidRequest`] for an invalid name and
    /// [`DirectoryError::PersonNotFound`] if there is no such record.
    pub async fn update_person(&self, id: PersonId, name: &str) -> Result<(), DirectoryError> {
        let name = validate_name(name)?;
        self.storage.get_person(id).await?;
        self.storage
            .update_person(id, &Person::new(id, name))
            .await?;
        tracing::info!(person_id = %id, "person updated");
        Ok(())
    }

    /// Deletes an existing person.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::PersonNotFound`] if there is no such record.
    pub async fn delete_person(&self, id: PersonId) -> Result<(), DirectoryError> {
        self.storage.get_person(id).await?;
        self.storage.delete_person(id).await?;
        tracing::info!(person_id = %id, "person deleted");
        Ok(())
    }

    /// Reconciles an uploaded CSV file against stored records.
    ///
    /// The whole file is validated first. Then, row by row, a known id is
    /// updated in place and an unknown id is inserted as a new record with
    /// a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::MalformedCsv`] before touching storage if
    /// any row is invalid. A backend failure aborts the import at that row;
    /// rows already applied stay applied.
    pub async fn process_csv(&self, data: &[u8]) -> Result<CsvImportReport, DirectoryError> {
        let rows = csv_codec::parse_rows(data)?;
        let mut report = CsvImportReport::default();

        for row in rows {
            match self.storage.get_person(row.id).await {
                Ok(_) => {
                    self.storage
                        .update_person(row.id, &Person::new(row.id, row.name))
                        .await
                        .map_err(|e| {
                            e.context(&format!("csv line {}: failed to update person", row.line))
                        })?;
                    report.updated += 1;
                }
                Err(e) if e.is_not_found() => {
                    self.storage.add_person(&row.name).await.map_err(|e| {
                        e.context(&format!("csv line {}: failed to add person", row.line))
                    })?;
                    report.inserted += 1;
                }
                Err(e) => {
                    return Err(e.context(&format!("csv line {}: failed to get person", row.line)));
                }
            }
        }

        tracing::info!(
            updated = report.updated,
            inserted = report.inserted,
            "csv import finished"
        );
        Ok(report)
    }

    /// Exports every stored person as CSV with an `id,name` header.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the records cannot be loaded.
    pub async fn download_persons_csv(&self) -> Result<Vec<u8>, DirectoryError> {
        let persons = self
            .storage
            .get_all_persons()
            .await
            .map_err(|e| e.context("failed to get all persons"))?;
        csv_codec::encode_persons(&persons)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::persistence::InMemoryStorage;

    fn make_service() -> (PersonService, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        let service = PersonService::new(Arc::clone(&storage) as Arc<dyn PersonStorage>);
        (service, storage)
    }

    async fn names(service: &PersonService) -> Vec<String> {
        let Ok(persons) = service.get_all_persons().await else {
            panic!("list failed");
        };
        let mut names: Vec<String> = persons.into_iter().map(|p| p.name).collect();
        names.sort();
        names
    }

    /// Storage whose reads always fail with a backend error.
    #[derive(Debug)]
    struct UnreachableStorage;

    #[async_trait]
    impl PersonStorage for UnreachableStorage {
        fn backend_name(&self) -> &'static str {
            "unreachable"
        }

        async fn add_person(&self, _name: &str) -> Result<PersonId, DirectoryError> {
            Err(DirectoryError::StorageError("connection refused".to_string()))
        }

        async fn get_person(&self, _id: PersonId) -> Result<Person, DirectoryError> {
            Err(DirectoryError::StorageError("connection refused".to_string()))
        }

        async fn get_all_persons(&self) -> Result<Vec<Person>, DirectoryError> {
            Err(DirectoryError::StorageError("connection refused".to_string()))
        }

        async fn update_person(&self, _id: PersonId, _p: &Person) -> Result<(), DirectoryError> {
            Err(DirectoryError::StorageError("connection refused".to_string()))
        }

        async fn delete_person(&self, _id: PersonId) -> Result<(), DirectoryError> {
            Err(DirectoryError::StorageError("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn add_then_get_returns_same_record() {
        let (service, _) = make_service();
        let Ok(id) = service.add_person(" Alice ").await else {
            panic!("add failed");
        };
        let Ok(person) = service.get_person(id).await else {
            panic!("get failed");
        };
        assert_eq!(person, Person::new(id, "Alice"));
    }

    #[tokio::test]
    async fn add_rejects_blank_name() {
        let (service, storage) = make_service();
        let result = service.add_person("").await;
        assert!(matches!(result, Err(DirectoryError::InvalidRequest(_))));
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn directory_scenario() {
        let (service, _) = make_service();
        let Ok(alice) = service.add_person("Alice").await else {
            panic!("add failed");
        };
        let Ok(bob) = service.add_person("Bob").await else {
            panic!("add failed");
        };
        assert_ne!(alice, bob);
        assert_eq!(names(&service).await, vec!["Alice", "Bob"]);

        assert!(service.delete_person(alice).await.is_ok());
        assert_eq!(names(&service).await, vec!["Bob"]);

        let result = service.get_person(alice).await;
        assert!(matches!(result, Err(DirectoryError::PersonNotFound(id)) if id == alice));
    }

    #[tokio::test]
    async fn update_missing_is_not_found_and_creates_nothing() {
        let (service, storage) = make_service();
        let result = service.update_person(PersonId::new(), "Ghost").await;
        assert!(matches!(result, Err(DirectoryError::PersonNotFound(_))));
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn update_replaces_name() {
        let (service, _) = make_service();
        let Ok(id) = service.add_person("Alice").await else {
            panic!("add failed");
        };
        assert!(service.update_person(id, "Alicia").await.is_ok());
        let Ok(person) = service.get_person(id).await else {
            panic!("get failed");
        };
        assert_eq!(person.name, "Alicia");
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let (service, _) = make_service();
        let result = service.delete_person(PersonId::new()).await;
        assert!(matches!(result, Err(DirectoryError::PersonNotFound(_))));
    }

    #[tokio::test]
    async fn count_tracks_adds_minus_deletes() {
        let (service, storage) = make_service();
        let mut ids = Vec::new();
        for i in 0..5 {
            let Ok(id) = service.add_person(&format!("p{i}")).await else {
                panic!("add failed");
            };
            ids.push(id);
        }
        for id in ids.iter().take(2) {
            assert!(service.delete_person(*id).await.is_ok());
        }
        assert_eq!(storage.len().await, 3);
    }

    #[tokio::test]
    async fn csv_updates_every_known_row() {
        let (service, _) = make_service();
        let Ok(a) = service.add_person("Alice").await else {
            panic!("add failed");
        };
        let Ok(b) = service.add_person("Bob").await else {
            panic!("add failed");
        };

        let csv = format!("id,name\n{a},Alicia\n{b},Robert\n");
        let Ok(report) = service.process_csv(csv.as_bytes()).await else {
            panic!("import failed");
        };
        assert_eq!(
            report,
            CsvImportReport {
                updated: 2,
                inserted: 0
            }
        );
        assert_eq!(names(&service).await, vec!["Alicia", "Robert"]);
    }

    #[tokio::test]
    async fn csv_inserts_unknown_rows_with_fresh_ids() {
        let (service, storage) = make_service();
        let Ok(a) = service.add_person("Alice").await else {
            panic!("add failed");
        };
        let unknown = PersonId::new();

        let csv = format!("id,name\n{a},Alicia\n{unknown},Carol\n");
        let Ok(report) = service.process_csv(csv.as_bytes()).await else {
            panic!("import failed");
        };
        assert_eq!(report.updated, 1);
        assert_eq!(report.inserted, 1);
        assert_eq!(storage.len().await, 2);
        assert!(service.get_person(unknown).await.is_err());
        assert_eq!(names(&service).await, vec!["Alicia", "Carol"]);
    }

    #[tokio::test]
    async fn csv_round_trip_creates_no_records() {
        let (service, storage) = make_service();
        for name in ["Alice", "Bob", "Doe, Jane"] {
            assert!(service.add_person(name).await.is_ok());
        }

        let Ok(exported) = service.download_persons_csv().await else {
            panic!("export failed");
        };
        let Ok(report) = service.process_csv(&exported).await else {
            panic!("import failed");
        };
        assert_eq!(report.updated, 3);
        assert_eq!(report.inserted, 0);
        assert_eq!(storage.len().await, 3);
    }

    #[tokio::test]
    async fn malformed_csv_leaves_storage_unchanged() {
        let (service, storage) = make_service();
        let Ok(a) = service.add_person("Alice").await else {
            panic!("add failed");
        };
        let unknown = PersonId::new();

        // Valid rows before the bad one must not be applied.
        let csv = format!("id,name\n{a},Alicia\n{unknown},Carol\n{a},too,many\n");
        let result = service.process_csv(csv.as_bytes()).await;
        assert!(matches!(result, Err(DirectoryError::MalformedCsv(_))));

        assert_eq!(storage.len().await, 1);
        assert_eq!(names(&service).await, vec!["Alice"]);
    }

    #[tokio::test]
    async fn unterminated_quote_leaves_storage_unchanged() {
        let (service, storage) = make_service();
        let Ok(a) = service.add_person("Alice").await else {
            panic!("add failed");
        };
        let Ok(b) = service.add_person("Bob").await else {
            panic!("add failed");
        };

        // Without the quote check this would rename Alice to "Alicia\n<b>,Robert".
        let csv = format!("id,name\n{a},\"Alicia\n{b},Robert\n");
        let result = service.process_csv(csv.as_bytes()).await;
        assert!(matches!(result, Err(DirectoryError::MalformedCsv(_))));

        assert_eq!(storage.len().await, 2);
        assert_eq!(names(&service).await, vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn header_only_csv_is_malformed() {
        let (service, _) = make_service();
        let result = service.process_csv(b"id,name\n").await;
        assert!(matches!(result, Err(DirectoryError::MalformedCsv(_))));
    }

    #[tokio::test]
    async fn backend_failure_aborts_import() {
        let service = PersonService::new(Arc::new(UnreachableStorage));
        let csv = format!("id,name\n{},Alice\n", PersonId::new());
        match service.process_csv(csv.as_bytes()).await {
            Err(DirectoryError::StorageError(msg)) => {
                assert!(msg.starts_with("csv line 2"), "{msg}");
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn export_propagates_backend_failure() {
        let service = PersonService::new(Arc::new(UnreachableStorage));
        let result = service.download_persons_csv().await;
        assert!(matches!(result, Err(DirectoryError::StorageError(_))));
    }
}
