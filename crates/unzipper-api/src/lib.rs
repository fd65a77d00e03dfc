//! Unzipper API Library
//!
//! This crate provides the HTTP API handlers, services and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
mod services;
pub mod setup;
mod utils;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use services::extraction::ExtractionService;
