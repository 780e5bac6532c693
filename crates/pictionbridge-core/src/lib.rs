//! PictionBridge core library
//!
//! This crate provides the domain models, error types, configuration, and the
//! update-source trait shared across all PictionBridge components.
//!
//! The `sqlx` feature (default) lets [`BridgeError`] carry database errors
//! directly. With `default-features = false`, build without the `sqlx` feature;
//! then `BridgeError` has no database variant.

pub mod config;
pub mod error;
pub mod models;
pub mod source;

// Re-export commonly used types
pub use config::BridgeConfig;
pub use error::BridgeError;
pub use source::UpdateSource;
