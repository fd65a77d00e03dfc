//! Upload identifiers and download path parsing.
//!
//! A download path is `{upload_id}/{relative path}`. Parsing is purely lexical: it rejects
//! anything that could name a location outside the upload directory before the filesystem
//! is touched. The store still canonicalizes the result, which catches symlinks.

use crate::traits::{StorageError, StorageResult};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier binding an uploaded archive to its extraction directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(Uuid);

impl UploadId {
    /// Allocate a fresh random identifier.
    pub fn generate() -> Self {
        UploadId(Uuid::new_v4())
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for UploadId {
    type Err = StorageError;

    fn from_str(s: &str) -> StorageResult<Self> {
        // Only the canonical hyphenated form names a directory we created.
        match Uuid::try_parse(s) {
            Ok(uuid) if uuid.hyphenated().to_string() == s => Ok(UploadId(uuid)),
            _ => Err(StorageError::NotFound(format!("unknown upload id '{}'", s))),
        }
    }
}

/// A lexically validated `{upload_id}/{relative path}` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPath {
    pub upload_id: UploadId,
    segments: Vec<String>,
}

impl DownloadPath {
    /// Relative path inside the upload directory.
    pub fn relative_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    /// Final path segment, used as the attachment filename.
    pub fn file_name(&self) -> &str {
        // parse() guarantees at least one segment
        self.segments.last().map(String::as_str).unwrap_or("download")
    }
}

impl fmt::Display for DownloadPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.upload_id, self.segments.join("/"))
    }
}

impl FromStr for DownloadPath {
    type Err = StorageError;

    fn from_str(raw: &str) -> StorageResult<Self> {
        if raw.is_empty() {
            return Err(StorageError::InvalidPath("empty path".to_string()));
        }
        if raw.contains('\\') || raw.contains('\0') {
            return Err(StorageError::InvalidPath(
                "path contains invalid characters".to_string(),
            ));
        }
        if raw.starts_with('/') {
            return Err(StorageError::InvalidPath("path must be relative".to_string()));
        }

        let mut parts = Vec::new();
        for segment in raw.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(StorageError::InvalidPath(
                    "path contains empty or relative segments".to_string(),
                ));
            }
            parts.push(segment);
        }

        // Well-formed but naming nothing we extracted: absent rather than invalid
        let upload_id: UploadId = parts[0].parse()?;
        let segments: Vec<String> = parts[1..].iter().map(|s| s.to_string()).collect();
        if segments.is_empty() {
            return Err(StorageError::NotFound(format!(
                "{} does not name a file inside the upload",
                raw
            )));
        }

        Ok(DownloadPath {
            upload_id,
            segments,
        })
    }
}
