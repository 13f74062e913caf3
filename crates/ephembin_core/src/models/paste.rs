//! Paste record and API payload models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored paste with its expiry state.
///
/// `content`, `created_at`, `expires_at`, and `max_views` never change after
/// creation. `remaining_views` only ever moves down, and only inside the
/// store's per-shard critical section. Deletion is absence from the store;
/// there is no tombstone flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasteRecord {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub max_views: u32,
    pub remaining_views: u32,
}

/// Request payload for creating a paste.
///
/// `ttl_seconds` and `max_views` are required; default-filling is a client
/// concern, not a server one.
#[derive(Debug, Deserialize)]
pub struct CreatePasteRequest {
    pub content: String,
    pub ttl_seconds: i64,
    pub max_views: i64,
}

/// Response payload for a created paste.
#[derive(Debug, Serialize)]
pub struct CreatePasteResponse {
    pub id: String,
    pub url: String,
}

/// Response payload for a successful consume.
#[derive(Debug, Serialize)]
pub struct PasteContentResponse {
    pub content: String,
    pub remaining_views: u32,
    pub expires_at: DateTime<Utc>,
}
