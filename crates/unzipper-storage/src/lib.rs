//! Unzipper Storage Library
//!
//! This crate provides the archive store: the filesystem area holding transient uploaded
//! archives and the persistent per-upload extraction directories.
//!
//! # Layout
//!
//! Two sibling directories under a data root:
//!
//! - `uploads/` holds scratch archive files, removed when the upload request finishes
//! - `extracted/{upload_id}/` holds the contents of one upload, never cleaned by the service
//!
//! Download paths have the form `{upload_id}/{relative path}`. Path parsing and
//! containment checks are centralized in the `keys` module so every operation applies the
//! same rules.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use keys::{DownloadPath, UploadId};
pub use local::LocalArchiveStore;
pub use traits::{ArchiveStore, ScratchArchive, StorageError, StorageResult, StoredFile};
