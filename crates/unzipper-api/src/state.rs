//! Application state shared by all handlers.

use crate::services::extraction::ExtractionService;
use std::sync::Arc;
use unzipper_core::Config;
use unzipper_storage::ArchiveStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ArchiveStore>,
    pub extraction: ExtractionService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ArchiveStore>, extraction: ExtractionService) -> Self {
        Self {
            config,
            store,
            extraction,
        }
    }
}
