//! Expiration policy predicates.
//!
//! The consume path and the reaper must agree exactly on what "alive" means;
//! both consult these predicates so the read-side and sweep-side definitions
//! cannot drift.

use crate::models::paste::PasteRecord;
use chrono::{DateTime, Utc};

/// A record is time-expired once `now` reaches `expires_at`.
pub fn is_expired(record: &PasteRecord, now: DateTime<Utc>) -> bool {
    now >= record.expires_at
}

/// A record with no remaining views is exhausted.
pub fn is_exhausted(record: &PasteRecord) -> bool {
    record.remaining_views == 0
}

/// A record is servable iff it is neither time-expired nor view-exhausted.
pub fn is_alive(record: &PasteRecord, now: DateTime<Utc>) -> bool {
    !is_expired(record, now) && !is_exhausted(record)
}
