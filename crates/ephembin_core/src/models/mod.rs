//! Data models for API requests and stored records.

/// Paste record and payload types.
pub mod paste;
