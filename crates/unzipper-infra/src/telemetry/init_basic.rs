use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use unzipper_core::is_production_name;

const DEFAULT_FILTER: &str = "unzipper=debug,tower_http=debug";

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    pub fn for_environment(environment: &str) -> Self {
        if is_production_name(environment) {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// Initialize tracing for the given environment.
///
/// `RUST_LOG` overrides the default filter. Fails if a global subscriber is already set.
pub fn init_telemetry(environment: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    let format = LogFormat::for_environment(environment);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()?,
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()?,
    }

    tracing::info!(environment = %environment, format = ?format, "Tracing initialized");
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
