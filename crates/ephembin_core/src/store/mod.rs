//! Sharded in-memory paste storage with atomic consume-on-read.

use crate::constants::{MAX_ID_GENERATION_ATTEMPTS, STORE_SHARD_COUNT};
use crate::error::AppError;
use crate::models::paste::PasteRecord;
use crate::{ident, policy};
use chrono::{DateTime, Duration, Utc};
use std::collections::hash_map::{DefaultHasher, Entry};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard};

type Shard = HashMap<String, PasteRecord>;

/// Outcome of a single consume attempt.
///
/// All four variants are ordinary lifecycle results, not errors. Callers at
/// the API boundary are expected to collapse `NotFound`, `Expired`, and
/// `Exhausted` into one uniform response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// The read succeeded and spent one unit of view budget.
    Content {
        content: String,
        remaining_views: u32,
        expires_at: DateTime<Utc>,
    },
    /// No record exists under this id.
    NotFound,
    /// The record's ttl had elapsed before this read.
    Expired,
    /// The record had no view budget left.
    Exhausted,
}

impl ConsumeOutcome {
    /// Short label for logs and assertions; never includes paste content.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Content { .. } => "content",
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::Exhausted => "exhausted",
        }
    }
}

/// Keyed paste storage; the sole owner of record mutation.
///
/// Records are spread across lock shards by id hash. Every operation on an id
/// runs under that id's shard mutex, so operations on the same id are
/// strictly ordered (linearizable per key) while unrelated ids proceed in
/// parallel up to incidental shard sharing. Critical sections are pure
/// in-memory check-and-mutate with no I/O.
pub struct PasteStore {
    shards: Vec<Mutex<Shard>>,
}

fn lock(shard: &Mutex<Shard>) -> Result<MutexGuard<'_, Shard>, AppError> {
    shard
        .lock()
        .map_err(|_| AppError::StoreUnavailable("paste store shard lock is poisoned".to_string()))
}

impl Default for PasteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PasteStore {
    /// Create a store with the default shard count.
    pub fn new() -> Self {
        Self::with_shard_count(STORE_SHARD_COUNT)
    }

    /// Create a store with an explicit shard count (minimum 1).
    pub fn with_shard_count(count: usize) -> Self {
        let count = count.max(1);
        Self {
            shards: (0..count).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }

    fn shard(&self, id: &str) -> Result<MutexGuard<'_, Shard>, AppError> {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.shards.len();
        lock(&self.shards[index])
    }

    /// Validate parameters, mint an id, and insert a new record.
    ///
    /// Id generation retries while the minted id collides with a live record,
    /// so a fresh create can never alias an existing paste.
    ///
    /// # Arguments
    /// - `content`: Paste body; must be non-empty.
    /// - `ttl_seconds`: Lifetime in seconds; must be positive.
    /// - `max_views`: View budget; must be positive and fit in `u32`.
    /// - `now`: Creation timestamp.
    ///
    /// # Returns
    /// The stored [`PasteRecord`].
    ///
    /// # Errors
    /// [`AppError::InvalidParameters`] for empty content, non-positive or
    /// out-of-range ttl/views; [`AppError::StoreUnavailable`] when a shard
    /// lock is poisoned or id generation attempts are exhausted.
    pub fn create(
        &self,
        content: String,
        ttl_seconds: i64,
        max_views: i64,
        now: DateTime<Utc>,
    ) -> Result<PasteRecord, AppError> {
        if content.is_empty() {
            return Err(AppError::InvalidParameters(
                "Content cannot be empty".to_string(),
            ));
        }
        if ttl_seconds <= 0 {
            return Err(AppError::InvalidParameters(
                "ttl_seconds must be a positive integer".to_string(),
            ));
        }
        if max_views <= 0 {
            return Err(AppError::InvalidParameters(
                "max_views must be a positive integer".to_string(),
            ));
        }
        let max_views = u32::try_from(max_views)
            .map_err(|_| AppError::InvalidParameters("max_views is out of range".to_string()))?;
        let expires_at = Duration::try_seconds(ttl_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::InvalidParameters("ttl_seconds is out of range".to_string())
            })?;

        let mut record = PasteRecord {
            id: ident::generate(),
            content,
            created_at: now,
            expires_at,
            max_views,
            remaining_views: max_views,
        };

        for _ in 0..MAX_ID_GENERATION_ATTEMPTS {
            {
                let mut shard = self.shard(&record.id)?;
                if let Entry::Vacant(slot) = shard.entry(record.id.clone()) {
                    slot.insert(record.clone());
                    return Ok(record);
                }
            }
            // A live record already owns this id; mint another one.
            tracing::warn!(id = %record.id, "paste id collision, regenerating");
            record.id = ident::generate();
        }

        Err(AppError::StoreUnavailable(
            "exhausted paste id generation attempts".to_string(),
        ))
    }

    /// Non-consuming lookup.
    ///
    /// # Returns
    /// A clone of the record when present; never decrements.
    ///
    /// # Errors
    /// [`AppError::StoreUnavailable`] when the shard lock is poisoned.
    pub fn peek(&self, id: &str) -> Result<Option<PasteRecord>, AppError> {
        Ok(self.shard(id)?.get(id).cloned())
    }

    /// Atomically consume one view of a paste.
    ///
    /// The whole sequence — expiry check, budget check, decrement, removal at
    /// zero — runs inside the shard lock owning `id`, so concurrent callers
    /// observe some strict total order and a view unit is never spent twice.
    /// Dead records (expired, or exhausted via stale state) are removed on
    /// sight and stay unreachable for every later call.
    ///
    /// # Arguments
    /// - `id`: Paste id to consume.
    /// - `now`: Timestamp the expiry check is evaluated against.
    ///
    /// # Returns
    /// A [`ConsumeOutcome`] describing the result.
    ///
    /// # Errors
    /// [`AppError::StoreUnavailable`] when the shard lock is poisoned.
    pub fn try_consume(&self, id: &str, now: DateTime<Utc>) -> Result<ConsumeOutcome, AppError> {
        let mut shard = self.shard(id)?;
        let Entry::Occupied(mut slot) = shard.entry(id.to_string()) else {
            return Ok(ConsumeOutcome::NotFound);
        };

        if policy::is_expired(slot.get(), now) {
            slot.remove();
            return Ok(ConsumeOutcome::Expired);
        }
        if policy::is_exhausted(slot.get()) {
            // Records are removed when their last view is spent, so this only
            // guards against stale state.
            slot.remove();
            return Ok(ConsumeOutcome::Exhausted);
        }

        let record = slot.get_mut();
        record.remaining_views -= 1;
        let outcome = ConsumeOutcome::Content {
            content: record.content.clone(),
            remaining_views: record.remaining_views,
            expires_at: record.expires_at,
        };
        if record.remaining_views == 0 {
            slot.remove();
        }
        Ok(outcome)
    }

    /// Idempotent removal.
    ///
    /// # Returns
    /// `true` when a record was removed, `false` when it was already absent.
    ///
    /// # Errors
    /// [`AppError::StoreUnavailable`] when the shard lock is poisoned.
    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.shard(id)?.remove(id).is_some())
    }

    /// Remove every record whose ttl has elapsed.
    ///
    /// Sweeps shard by shard under the same locks the consume path uses, so a
    /// sweep can never interleave with a consume on the same id.
    ///
    /// # Arguments
    /// - `now`: Timestamp records are expired against.
    ///
    /// # Returns
    /// The number of records removed.
    ///
    /// # Errors
    /// [`AppError::StoreUnavailable`] when a shard lock is poisoned.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let mut removed = 0;
        for shard in &self.shards {
            let mut records = lock(shard)?;
            let before = records.len();
            records.retain(|_, record| !policy::is_expired(record, now));
            removed += before - records.len();
        }
        Ok(removed)
    }

    /// Number of live records across all shards.
    ///
    /// # Errors
    /// [`AppError::StoreUnavailable`] when a shard lock is poisoned.
    pub fn len(&self) -> Result<usize, AppError> {
        let mut total = 0;
        for shard in &self.shards {
            total += lock(shard)?.len();
        }
        Ok(total)
    }

    /// Whether the store currently holds no records.
    ///
    /// # Errors
    /// [`AppError::StoreUnavailable`] when a shard lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests;
