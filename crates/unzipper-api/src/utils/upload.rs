//! Multipart upload helpers

use crate::constants::UPLOAD_FIELD;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use unzipper_core::AppError;

/// An archive received through the multipart form
#[derive(Debug)]
pub struct UploadedArchive {
    pub data: Bytes,
    pub file_name: Option<String>,
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum allowed size".to_string())
    } else {
        AppError::InvalidInput(format!("{}: {}", context, err.body_text()))
    }
}

/// Extract the archive from a multipart form.
/// Only one field named "file" is accepted; other fields are ignored.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<UploadedArchive, AppError> {
    let mut archive: Option<UploadedArchive> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        if archive.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file data", e))?;

        archive = Some(UploadedArchive { data, file_name });
    }

    archive.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}
