//! Core domain library for ephembin (config, storage, expiry policy).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across ephembin crates.
pub mod constants;
/// Application error types (storage/domain).
pub mod error;
/// Paste identifier generation.
pub mod ident;
/// Data models for API requests and stored records.
pub mod models;
/// Expiration policy predicates.
pub mod policy;
/// Paste storage and consume-on-read coordination.
pub mod store;

pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use error::AppError;
pub use store::{ConsumeOutcome, PasteStore};
