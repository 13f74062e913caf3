//! Paste HTTP handlers.

use crate::error::HttpError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use ephembin_core::models::paste::{CreatePasteRequest, CreatePasteResponse, PasteContentResponse};
use ephembin_core::{AppError, ConsumeOutcome};
use hyper::HeaderMap;

/// Header that moves the consume clock forward for deterministic expiry
/// tests. Values are Unix milliseconds.
pub const TEST_NOW_HEADER: &str = "x-ephembin-test-now-ms";

fn paste_url(base_url: &str, id: &str) -> String {
    format!("{}/api/pastes/{}", base_url.trim_end_matches('/'), id)
}

/// Resolve the timestamp a consume is evaluated against.
///
/// The test header can only move the clock forward; an earlier timestamp
/// must never make an already-expired paste readable again.
fn effective_now(headers: &HeaderMap) -> DateTime<Utc> {
    let now = Utc::now();
    let Some(value) = headers.get(TEST_NOW_HEADER) else {
        return now;
    };
    let overridden = value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .and_then(DateTime::<Utc>::from_timestamp_millis);
    match overridden {
        Some(at) if at > now => at,
        _ => now,
    }
}

/// Create a new paste.
///
/// # Arguments
/// - `state`: Application state.
/// - `req`: Paste creation payload.
///
/// # Returns
/// `201 Created` with the paste id and shareable URL.
///
/// # Errors
/// Returns an error if validation fails or the store is unavailable.
pub async fn create_paste(
    State(state): State<AppState>,
    Json(req): Json<CreatePasteRequest>,
) -> Result<(StatusCode, Json<CreatePasteResponse>), HttpError> {
    if req.content.len() > state.config.max_paste_size {
        return Err(AppError::InvalidParameters(format!(
            "Paste size exceeds maximum of {} bytes",
            state.config.max_paste_size
        ))
        .into());
    }

    let record = state
        .store
        .create(req.content, req.ttl_seconds, req.max_views, Utc::now())?;
    tracing::debug!(
        id = %record.id,
        expires_at = %record.expires_at,
        max_views = record.max_views,
        "created paste"
    );

    let url = paste_url(&state.config.public_base_url(), &record.id);
    Ok((
        StatusCode::CREATED,
        Json(CreatePasteResponse { id: record.id, url }),
    ))
}

/// Consume one view of a paste.
///
/// # Arguments
/// - `state`: Application state.
/// - `id`: Paste identifier from the path.
/// - `headers`: Request headers (consulted for the test clock override).
///
/// # Returns
/// The paste content with its remaining budget and deadline.
///
/// # Errors
/// Expired, exhausted, and never-existed pastes all produce the same 404 so
/// the response does not reveal whether a paste ever existed.
pub async fn consume_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PasteContentResponse>, HttpError> {
    let now = effective_now(&headers);
    match state.store.try_consume(&id, now)? {
        ConsumeOutcome::Content {
            content,
            remaining_views,
            expires_at,
        } => Ok(Json(PasteContentResponse {
            content,
            remaining_views,
            expires_at,
        })),
        other => {
            tracing::debug!(id = %id, reason = other.label(), "paste unavailable");
            Err(AppError::NotFound.into())
        }
    }
}
