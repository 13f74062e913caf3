//! Application error types for core storage and domain logic.
use thiserror::Error;

/// Top-level application error type.
///
/// Expired and exhausted pastes are not errors; they are ordinary
/// [`crate::store::ConsumeOutcome`] variants. This enum only covers
/// caller mistakes and store failures.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Not found")]
    NotFound,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}
