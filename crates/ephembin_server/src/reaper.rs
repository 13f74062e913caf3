//! Background sweep of time-expired pastes.
//!
//! The reaper is best-effort storage reclamation: correctness of "never serve
//! an expired or exhausted paste" is carried entirely by the store's consume
//! path. The sweep only bounds memory growth from pastes that expire without
//! ever being read.

use chrono::Utc;
use ephembin_core::PasteStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn the periodic reaper task.
///
/// # Arguments
/// - `store`: Shared paste store to sweep.
/// - `interval`: Delay between sweeps.
///
/// # Returns
/// The task handle; abort it to stop sweeping.
pub fn spawn_reaper(store: Arc<PasteStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval completes immediately; skip it so the
        // first sweep happens one full interval after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match store.sweep_expired(Utc::now()) {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "swept expired pastes"),
                Err(err) => tracing::error!("Failed to sweep expired pastes: {}", err),
            }
        }
    })
}
