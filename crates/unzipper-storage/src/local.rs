use crate::keys::{DownloadPath, UploadId};
use crate::traits::{ArchiveStore, ScratchArchive, StorageError, StorageResult, StoredFile};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use unzipper_core::models::ExtractedFile;
use walkdir::WalkDir;

/// Local filesystem archive store
#[derive(Clone, Debug)]
pub struct LocalArchiveStore {
    scratch_dir: PathBuf,
    extracted_dir: PathBuf,
    /// Canonical form of `extracted_dir`, resolved once at construction
    extracted_root: PathBuf,
}

async fn run_blocking<T, F>(f: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::IoError(std::io::Error::other(e)))?
}

impl LocalArchiveStore {
    /// Create a new LocalArchiveStore, creating both directories if needed
    ///
    /// # Arguments
    /// * `scratch_dir` - Directory for transient uploaded archives (e.g. "./uploads")
    /// * `extracted_dir` - Directory holding one subdirectory per upload (e.g. "./extracted")
    pub async fn new(
        scratch_dir: impl Into<PathBuf>,
        extracted_dir: impl Into<PathBuf>,
    ) -> StorageResult<Self> {
        let scratch_dir = scratch_dir.into();
        let extracted_dir = extracted_dir.into();

        for dir in [&scratch_dir, &extracted_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let extracted_root = fs::canonicalize(&extracted_dir).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to canonicalize extraction directory {}: {}",
                extracted_dir.display(),
                e
            ))
        })?;

        Ok(LocalArchiveStore {
            scratch_dir,
            extracted_dir,
            extracted_root,
        })
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn extracted_dir(&self) -> &Path {
        &self.extracted_dir
    }

    fn upload_dir(&self, upload_id: UploadId) -> PathBuf {
        self.extracted_dir.join(upload_id.to_string())
    }

    /// Check that a canonical path lies inside the given upload's directory.
    ///
    /// Comparison is component-wise, so `extracted-old/...` never matches `extracted/`.
    fn is_contained(&self, canonical: &Path, upload_id: UploadId) -> bool {
        let Ok(rest) = canonical.strip_prefix(&self.extracted_root) else {
            return false;
        };
        let mut components = rest.components();
        let id = upload_id.to_string();
        matches!(components.next(), Some(Component::Normal(first)) if first == id.as_str())
            && components.next().is_some()
    }
}

/// Render a path relative to the upload directory with `/` separators.
fn relative_display(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl ArchiveStore for LocalArchiveStore {
    async fn stage_archive(&self, data: Bytes) -> StorageResult<ScratchArchive> {
        let scratch_dir = self.scratch_dir.clone();
        let start = std::time::Instant::now();

        let file = run_blocking(move || {
            tempfile::Builder::new()
                .prefix("upload-")
                .suffix(".zip")
                .tempfile_in(&scratch_dir)
                .map_err(|e| {
                    StorageError::WriteFailed(format!(
                        "Failed to create scratch file in {}: {}",
                        scratch_dir.display(),
                        e
                    ))
                })
        })
        .await?;

        let size = data.len() as u64;
        fs::write(file.path(), &data).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to write scratch file {}: {}",
                file.path().display(),
                e
            ))
        })?;

        tracing::debug!(
            path = %file.path().display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Archive staged to scratch storage"
        );

        Ok(ScratchArchive::new(file, size))
    }

    async fn create_upload(&self) -> StorageResult<(UploadId, PathBuf)> {
        let upload_id = UploadId::generate();
        let dir = self.upload_dir(upload_id);

        fs::create_dir(&dir).await.map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                StorageError::Collision(dir.display().to_string())
            } else {
                StorageError::WriteFailed(format!(
                    "Failed to create upload directory {}: {}",
                    dir.display(),
                    e
                ))
            }
        })?;

        tracing::debug!(upload_id = %upload_id, path = %dir.display(), "Upload directory created");

        Ok((upload_id, dir))
    }

    async fn list_upload(&self, upload_id: UploadId) -> StorageResult<Vec<ExtractedFile>> {
        let root = self.upload_dir(upload_id);

        run_blocking(move || {
            if !root.is_dir() {
                return Err(StorageError::NotFound(upload_id.to_string()));
            }

            let mut files = Vec::new();
            for entry in WalkDir::new(&root).follow_links(false) {
                let entry = entry.map_err(|e| {
                    StorageError::ReadFailed(format!(
                        "Failed to walk {}: {}",
                        root.display(),
                        e
                    ))
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let relative = entry.path().strip_prefix(&root).map_err(|_| {
                    StorageError::ReadFailed(format!(
                        "Entry {} escaped upload directory",
                        entry.path().display()
                    ))
                })?;
                let size = entry
                    .metadata()
                    .map_err(|e| StorageError::ReadFailed(e.to_string()))?
                    .len();

                files.push(ExtractedFile {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path: format!("{}/{}", upload_id, relative_display(relative)),
                    size,
                });
            }

            files.sort_by(|a, b| a.path.cmp(&b.path));
            Ok(files)
        })
        .await
    }

    async fn discard_upload(&self, upload_id: UploadId) -> StorageResult<()> {
        let dir = self.upload_dir(upload_id);

        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                tracing::debug!(upload_id = %upload_id, "Upload directory removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to remove {}: {}",
                dir.display(),
                e
            ))),
        }
    }

    async fn resolve(&self, path: &DownloadPath) -> StorageResult<PathBuf> {
        let candidate = self
            .upload_dir(path.upload_id)
            .join(path.relative_path());

        let canonical = match fs::canonicalize(&candidate).await {
            Ok(canonical) => canonical,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path.to_string()))
            }
            // A file used as a directory component
            Err(e) if e.kind() == ErrorKind::NotADirectory => {
                return Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => return Err(StorageError::IoError(e)),
        };

        if !self.is_contained(&canonical, path.upload_id) {
            tracing::warn!(
                requested = %path,
                resolved = %canonical.display(),
                "Download path resolves outside its upload directory"
            );
            return Err(StorageError::InvalidPath(
                "Path resolves outside storage directory".to_string(),
            ));
        }

        Ok(canonical)
    }

    async fn open(&self, path: &DownloadPath) -> StorageResult<StoredFile> {
        let resolved = self.resolve(path).await?;

        let metadata = fs::metadata(&resolved)
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(path.to_string()));
        }

        let file = fs::File::open(&resolved).await.map_err(|e| {
            StorageError::ReadFailed(format!(
                "Failed to open file {}: {}",
                resolved.display(),
                e
            ))
        })?;

        let key = path.to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(path = %key, error = %e, "Stream read error");
                StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(StoredFile {
            file_name: path.file_name().to_string(),
            size: metadata.len(),
            stream: Box::pin(stream),
        })
    }

    async fn health_check(&self) -> StorageResult<()> {
        let scratch_dir = self.scratch_dir.clone();
        let extracted_dir = self.extracted_dir.clone();

        run_blocking(move || {
            if !extracted_dir.is_dir() {
                return Err(StorageError::NotFound(extracted_dir.display().to_string()));
            }
            // Dropped immediately; proves the scratch directory accepts writes.
            tempfile::NamedTempFile::new_in(&scratch_dir)?;
            Ok(())
        })
        .await
    }
}
