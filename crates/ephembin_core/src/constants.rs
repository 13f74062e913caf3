//! Shared constants used across ephembin crates.

/// Default API port for ephembin.
pub const DEFAULT_PORT: u16 = 8080;

/// Default maximum paste size accepted by the API layer.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 1024 * 1024;

/// Default reaper sweep interval in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;

/// Number of lock shards in the paste store.
pub const STORE_SHARD_COUNT: usize = 64;

/// Attempts to mint a unique paste id before giving up.
pub const MAX_ID_GENERATION_ATTEMPTS: usize = 16;
