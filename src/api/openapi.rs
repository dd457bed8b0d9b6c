//! OpenAPI document for the REST API.

use utoipa::OpenApi;

use super::dto::{CreatePersonResponse, CsvUploadForm, PersonRequest};
use super::handlers::{bulk, person, system};
use crate::domain::{Person, PersonId};
use crate::error::{ErrorBody, ErrorResponse};
use crate::service::CsvImportReport;

/// Generated OpenAPI specification, served by Swagger UI when the
/// `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "person-directory",
        description = "CRUD and CSV bulk import/export for person records."
    ),
    paths(
        person::create_person,
        person::list_persons,
        person::get_person,
        person::update_person,
        person::delete_person,
        bulk::import_csv,
        bulk::export_csv,
        system::health_handler,
    ),
    components(schemas(
        Person,
        PersonId,
        PersonRequest,
        CreatePersonResponse,
        CsvUploadForm,
        CsvImportReport,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
    )),
    tags(
        (name = "Persons", description = "Person records"),
        (name = "CSV", description = "Bulk import and export"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/persons",
            "/api/v1/persons/{id}",
            "/api/v1/persons/import",
            "/api/v1/persons/export",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
