//! Unit tests for the paste store.

use super::*;
use std::sync::{Arc, Barrier};
use std::thread;

mod concurrency;

fn create_paste(store: &PasteStore, content: &str, ttl_seconds: i64, max_views: i64) -> PasteRecord {
    store
        .create(content.to_string(), ttl_seconds, max_views, Utc::now())
        .expect("create paste")
}

fn served(outcomes: &[ConsumeOutcome]) -> usize {
    outcomes
        .iter()
        .filter(|outcome| matches!(outcome, ConsumeOutcome::Content { .. }))
        .count()
}
