//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use unzipper_core::Config;

/// Validate critical configuration values
///
/// Fails fast on settings that would be unsafe or make every upload fail.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via the CORS_ORIGINS environment variable."
        ));
    }

    if config.max_extracted_size_bytes() < config.max_upload_size_bytes() as u64 {
        tracing::warn!(
            max_upload_bytes = config.max_upload_size_bytes(),
            max_extracted_bytes = config.max_extracted_size_bytes(),
            "Extraction limit is below the upload limit; large archives will be rejected"
        );
    }

    if config.data_dir().is_file() {
        return Err(anyhow::anyhow!(
            "DATA_DIR {} is a file, expected a directory",
            config.data_dir().display()
        ));
    }

    Ok(())
}
