//! Unzipper Infrastructure Library
//!
//! This crate provides shared infrastructure used by the API:
//! - ZIP extraction engine with entry and size limits
//! - Middleware (request ID, security headers)
//! - Tracing initialization

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "archive")]
pub mod archive;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{
    request_id_middleware, security_headers_middleware, RequestId, SecurityHeadersConfig,
    REQUEST_ID_HEADER,
};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};

#[cfg(feature = "archive")]
pub use archive::{extract_zip, ExtractError, ExtractLimits, ExtractSummary};
