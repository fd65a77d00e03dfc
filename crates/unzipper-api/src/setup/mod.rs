//! Application setup and initialization
//!
//! This module contains all application initialization logic, kept out of main.rs so the
//! integration tests can build the same router.

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::services::extraction::ExtractionService;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use unzipper_core::Config;
use unzipper_infra::ExtractLimits;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    unzipper_infra::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    build_app(config).await
}

/// Build state and router without touching global tracing state.
pub async fn build_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let store = storage::setup_storage(&config).await?;

    let limits = ExtractLimits {
        max_entries: config.max_archive_entries(),
        max_total_bytes: config.max_extracted_size_bytes(),
    };
    let extraction = ExtractionService::new(store.clone(), limits);
    tracing::debug!(
        max_entries = extraction.limits().max_entries,
        max_total_bytes = extraction.limits().max_total_bytes,
        "Extraction limits configured"
    );

    let state = Arc::new(AppState::new(config.clone(), store, extraction));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
