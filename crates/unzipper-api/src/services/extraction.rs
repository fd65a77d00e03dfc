//! Upload pipeline: stage the archive, unpack it into a fresh upload directory, list the
//! result.

use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use unzipper_core::models::ExtractedFile;
use unzipper_core::AppError;
use unzipper_infra::{extract_zip, ExtractLimits};
use unzipper_storage::{ArchiveStore, UploadId};

#[derive(Clone)]
pub struct ExtractionService {
    store: Arc<dyn ArchiveStore>,
    limits: ExtractLimits,
}

impl ExtractionService {
    pub fn new(store: Arc<dyn ArchiveStore>, limits: ExtractLimits) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> &ExtractLimits {
        &self.limits
    }

    /// Extract an uploaded archive and return the files it produced, sorted by path.
    ///
    /// On failure nothing of the upload is left behind: the scratch copy is always removed
    /// and the upload directory is discarded best-effort.
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn extract_upload(&self, data: Bytes) -> Result<Vec<ExtractedFile>, AppError> {
        let start = Instant::now();

        let scratch = self
            .store
            .stage_archive(data)
            .await
            .map_err(|e| AppError::ExtractionFailed(format!("Failed to stage archive: {}", e)))?;

        let (upload_id, dir) = self.store.create_upload().await.map_err(|e| {
            AppError::ExtractionFailed(format!("Failed to create upload directory: {}", e))
        })?;

        let result = self
            .unpack(scratch.path().to_path_buf(), upload_id, dir)
            .await;
        drop(scratch);

        match result {
            Ok(files) => {
                tracing::info!(
                    upload_id = %upload_id,
                    files = files.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Upload extracted"
                );
                Ok(files)
            }
            Err(err) => {
                self.discard(upload_id).await;
                Err(err)
            }
        }
    }

    async fn unpack(
        &self,
        archive: PathBuf,
        upload_id: UploadId,
        dir: PathBuf,
    ) -> Result<Vec<ExtractedFile>, AppError> {
        let limits = self.limits;
        tokio::task::spawn_blocking(move || extract_zip(&archive, &dir, &limits))
            .await
            .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))??;

        self.store.list_upload(upload_id).await.map_err(|e| {
            AppError::ExtractionFailed(format!("Failed to list extracted files: {}", e))
        })
    }

    async fn discard(&self, upload_id: UploadId) {
        if let Err(e) = self.store.discard_upload(upload_id).await {
            tracing::warn!(
                upload_id = %upload_id,
                error = %e,
                "Failed to remove partially extracted upload"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use unzipper_storage::LocalArchiveStore;
    use zip::write::{FileOptions, ZipWriter};

    fn build_zip(entries: &[(&str, &[u8])]) -> Bytes {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        Bytes::from(zip.finish().unwrap().into_inner())
    }

    async fn service_in(root: &std::path::Path, limits: ExtractLimits) -> ExtractionService {
        let store = LocalArchiveStore::new(root.join("uploads"), root.join("extracted"))
            .await
            .unwrap();
        ExtractionService::new(Arc::new(store), limits)
    }

    fn count_entries(dir: std::path::PathBuf) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_extract_upload_lists_files() {
        let root = tempfile::tempdir().unwrap();
        let service = service_in(root.path(), ExtractLimits::default()).await;

        let files = service
            .extract_upload(build_zip(&[("dir/b.txt", b"0123456789"), ("a.txt", b"hello")]))
            .await
            .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "a.txt");
        assert_eq!(files[0].size, 5);
        assert_eq!(files[1].name, "b.txt");
        assert!(files[1].path.ends_with("/dir/b.txt"));
        assert_eq!(count_entries(root.path().join("uploads")), 0);
    }

    #[tokio::test]
    async fn test_corrupt_archive_leaves_nothing_behind() {
        let root = tempfile::tempdir().unwrap();
        let service = service_in(root.path(), ExtractLimits::default()).await;

        let err = service
            .extract_upload(Bytes::from_static(b"definitely not a zip"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ExtractionFailed(_)));
        assert_eq!(count_entries(root.path().join("uploads")), 0);
        assert_eq!(count_entries(root.path().join("extracted")), 0);
    }

    #[tokio::test]
    async fn test_limit_violation_discards_partial_upload() {
        let root = tempfile::tempdir().unwrap();
        let limits = ExtractLimits {
            max_total_bytes: 8,
            ..ExtractLimits::default()
        };
        let service = service_in(root.path(), limits).await;

        let err = service
            .extract_upload(build_zip(&[("a.txt", b"hello"), ("b.txt", b"world")]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ArchiveTooLarge(_)));
        assert_eq!(count_entries(root.path().join("extracted")), 0);
    }
}
