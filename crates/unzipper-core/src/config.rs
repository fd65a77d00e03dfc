//! Configuration module
//!
//! This module provides configuration structures for the HTTP server and the archive
//! pipeline. Values come from the process environment (and a `.env` file when present).

use std::env;
use std::path::{Path, PathBuf};

// Common constants
const SERVER_PORT: u16 = 3000;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const MAX_UPLOAD_SIZE_MB: usize = 100;
const MAX_ARCHIVE_ENTRIES: usize = 10_000;
const MAX_EXTRACTED_SIZE_MB: u64 = 1024;

/// Directory names under the data root.
pub const SCRATCH_DIR_NAME: &str = "uploads";
pub const EXTRACTED_DIR_NAME: &str = "extracted";

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
}

/// Archive pipeline configuration
#[derive(Clone, Debug)]
pub struct ArchiveConfig {
    pub base: BaseConfig,
    /// Root holding the `uploads/` and `extracted/` directories
    pub data_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub max_archive_entries: usize,
    pub max_extracted_size_bytes: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ArchiveConfig>);

impl Config {
    fn as_archive(&self) -> &ArchiveConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_archive().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = ArchiveConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_archive().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_archive().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_archive().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_archive().base.environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_archive().base.http_concurrency_limit
    }

    pub fn data_dir(&self) -> &Path {
        &self.as_archive().data_dir
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.data_dir().join(SCRATCH_DIR_NAME)
    }

    pub fn extracted_dir(&self) -> PathBuf {
        self.data_dir().join(EXTRACTED_DIR_NAME)
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_archive().max_upload_size_bytes
    }

    pub fn max_archive_entries(&self) -> usize {
        self.as_archive().max_archive_entries
    }

    pub fn max_extracted_size_bytes(&self) -> u64 {
        self.as_archive().max_extracted_size_bytes
    }
}

/// Whether an `ENVIRONMENT` / `APP_ENV` value names production (`production` or `prod`, any case).
pub fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

/// Parse an optional variable, falling back to `default` when unset or blank.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number (got '{}')", key, raw)),
        _ => Ok(default),
    }
}

impl ArchiveConfig {
    /// Build configuration from a variable lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb: usize = parse_or(&lookup, "MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB)?;
        let max_extracted_size_mb: u64 =
            parse_or(&lookup, "MAX_EXTRACTED_SIZE_MB", MAX_EXTRACTED_SIZE_MB)?;

        let base = BaseConfig {
            server_port: parse_or(&lookup, "PORT", SERVER_PORT)?,
            cors_origins,
            environment,
            http_concurrency_limit: parse_or(
                &lookup,
                "HTTP_CONCURRENCY_LIMIT",
                HTTP_CONCURRENCY_LIMIT,
            )?,
        };

        let config = ArchiveConfig {
            base,
            data_dir: lookup("DATA_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            max_upload_size_bytes: max_upload_size_mb.saturating_mul(1024 * 1024),
            max_archive_entries: parse_or(&lookup, "MAX_ARCHIVE_ENTRIES", MAX_ARCHIVE_ENTRIES)?,
            max_extracted_size_bytes: max_extracted_size_mb.saturating_mul(1024 * 1024),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.cors_origins.is_empty() {
            return Err(anyhow::anyhow!("CORS_ORIGINS must list at least one origin"));
        }

        if self.base.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT cannot be 0"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
        }

        if self.max_archive_entries == 0 {
            return Err(anyhow::anyhow!("MAX_ARCHIVE_ENTRIES cannot be 0"));
        }

        if self.max_extracted_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_EXTRACTED_SIZE_MB cannot be 0"));
        }

        Ok(())
    }
}
