//! Archive store setup

use anyhow::{Context, Result};
use std::sync::Arc;
use unzipper_core::Config;
use unzipper_storage::{ArchiveStore, LocalArchiveStore};

/// Create the scratch and extraction directories under the data root
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn ArchiveStore>> {
    let store = LocalArchiveStore::new(config.scratch_dir(), config.extracted_dir())
        .await
        .context("Failed to initialize archive store")?;

    tracing::info!(
        scratch_dir = %store.scratch_dir().display(),
        extracted_dir = %store.extracted_dir().display(),
        "Archive store ready"
    );

    Ok(Arc::new(store))
}
