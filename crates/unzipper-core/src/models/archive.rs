use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// One regular file produced by extracting an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtractedFile {
    /// Final path segment
    pub name: String,
    /// `{upload_token}/{relative path}` with `/` separators
    pub path: String,
    /// Size in bytes
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub files: Vec<ExtractedFile>,
}

impl From<Vec<ExtractedFile>> for UploadResponse {
    fn from(files: Vec<ExtractedFile>) -> Self {
        Self { files }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadQuery {
    /// Path exactly as returned by the upload response
    pub path: Option<String>,
}
