//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use unzipper_core::models;

/// Returns the OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Unzipper API",
        version = "0.1.0",
        description = "Upload a ZIP archive, get back the list of files it contains, and download any of them individually."
    ),
    paths(
        handlers::archive_upload::upload_archive,
        handlers::file_download::download_file,
    ),
    components(schemas(
        models::ExtractedFile,
        models::UploadResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "archives", description = "Archive upload and extracted file download")
    )
)]
pub struct ApiDoc;
