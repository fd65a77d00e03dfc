use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;
use axum::{extract::Multipart, extract::State, Json};
use std::sync::Arc;
use unzipper_core::models::UploadResponse;

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "archives",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "ZIP archive in a field named `file`"),
    responses(
        (status = 200, description = "Archive extracted", body = UploadResponse),
        (status = 400, description = "Missing file or unsafe archive entry", body = ErrorResponse),
        (status = 413, description = "Upload or archive exceeds configured limits", body = ErrorResponse),
        (status = 500, description = "Archive could not be processed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_archive"))]
pub async fn upload_archive(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let archive = extract_multipart_file(multipart).await?;

    tracing::debug!(
        file_name = ?archive.file_name,
        size_bytes = archive.data.len(),
        "Archive received"
    );

    let files = state.extraction.extract_upload(archive.data).await?;

    Ok(Json(UploadResponse::from(files)))
}
