//! Tracing initialization
//!
//! Logs go to stdout: human-readable outside production, one JSON object per line in
//! production.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry, LogFormat};
