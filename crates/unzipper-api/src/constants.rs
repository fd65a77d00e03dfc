//! API constants

/// API base path prefix
pub const API_BASE: &str = "/api";

/// Multipart field carrying the uploaded archive
pub const UPLOAD_FIELD: &str = "file";
