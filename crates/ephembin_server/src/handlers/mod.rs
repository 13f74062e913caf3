//! HTTP request handlers.

/// Health endpoint.
pub mod health;
/// Paste endpoints.
pub mod paste;
