//! Archive store abstraction
//!
//! This module defines the ArchiveStore trait the extraction and retrieval services are
//! written against.

use crate::keys::{DownloadPath, UploadId};
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use thiserror::Error;
use unzipper_core::models::ExtractedFile;
use unzipper_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Upload directory already exists: {0}")]
    Collision(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => AppError::NotFound("File not found".to_string()),
            StorageError::InvalidPath(_) => AppError::InvalidInput("Invalid file path".to_string()),
            StorageError::WriteFailed(msg)
            | StorageError::ReadFailed(msg)
            | StorageError::DeleteFailed(msg) => AppError::Storage(msg),
            StorageError::Collision(path) => {
                AppError::Storage(format!("Upload directory already exists: {}", path))
            }
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// An uploaded archive persisted to the scratch directory.
///
/// The file is removed when this value is dropped.
#[derive(Debug)]
pub struct ScratchArchive {
    file: tempfile::NamedTempFile,
    size: u64,
}

impl ScratchArchive {
    pub(crate) fn new(file: tempfile::NamedTempFile, size: u64) -> Self {
        Self { file, size }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// An extracted file opened for streaming.
pub struct StoredFile {
    pub file_name: String,
    pub size: u64,
    pub stream: ByteStream,
}

impl std::fmt::Debug for StoredFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredFile")
            .field("file_name", &self.file_name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Archive store trait
///
/// Every path handed out or accepted by a store resolves inside its extraction root.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Persist an uploaded payload to a scratch file.
    async fn stage_archive(&self, data: Bytes) -> StorageResult<ScratchArchive>;

    /// Allocate a fresh upload id and create its (empty) extraction directory.
    ///
    /// Fails with [`StorageError::Collision`] rather than reusing an existing directory.
    async fn create_upload(&self) -> StorageResult<(UploadId, PathBuf)>;

    /// Enumerate regular files extracted for an upload, sorted by path.
    async fn list_upload(&self, upload_id: UploadId) -> StorageResult<Vec<ExtractedFile>>;

    /// Remove an upload directory and everything in it.
    async fn discard_upload(&self, upload_id: UploadId) -> StorageResult<()>;

    /// Resolve a download path to an absolute location inside the extraction root.
    async fn resolve(&self, path: &DownloadPath) -> StorageResult<PathBuf>;

    /// Open an extracted file as a byte stream.
    async fn open(&self, path: &DownloadPath) -> StorageResult<StoredFile>;

    /// Check that the store directories exist and are writable.
    async fn health_check(&self) -> StorageResult<()>;
}
