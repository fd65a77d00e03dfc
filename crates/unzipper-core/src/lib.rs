//! Unzipper Core Library
//!
//! This crate provides configuration, error types and the wire models shared by the
//! storage, infrastructure and API crates.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{is_production_name, ArchiveConfig, BaseConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
