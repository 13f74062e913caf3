//! Races on the consume path: the view budget must never be over-spent.

use super::*;

fn race_consumers(
    store: &Arc<PasteStore>,
    id: &str,
    now: DateTime<Utc>,
    readers: usize,
) -> Vec<ConsumeOutcome> {
    let barrier = Arc::new(Barrier::new(readers));
    let mut handles = Vec::with_capacity(readers);
    for _ in 0..readers {
        let store = Arc::clone(store);
        let barrier = Arc::clone(&barrier);
        let id = id.to_string();
        handles.push(thread::spawn(move || {
            barrier.wait();
            store.try_consume(&id, now).expect("consume")
        }));
    }
    handles
        .into_iter()
        .map(|handle| handle.join().expect("reader join"))
        .collect()
}

#[test]
fn single_view_paste_serves_exactly_one_of_many_readers() {
    let store = Arc::new(PasteStore::new());
    let record = create_paste(&store, "one shot", 300, 1);

    let outcomes = race_consumers(&store, &record.id, Utc::now(), 8);

    assert_eq!(served(&outcomes), 1, "exactly one reader wins the only view");
    assert_eq!(
        outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ConsumeOutcome::NotFound))
            .count(),
        7,
        "every loser sees the record as already gone"
    );
    assert!(store.is_empty().expect("is_empty"));
}

#[test]
fn view_budget_is_conserved_under_concurrent_readers() {
    let store = Arc::new(PasteStore::new());
    let record = create_paste(&store, "three views", 300, 3);

    let outcomes = race_consumers(&store, &record.id, Utc::now(), 10);

    assert_eq!(served(&outcomes), 3, "exactly max_views reads succeed");

    // Each success spent a distinct unit of budget: the remaining_views the
    // winners observed must be exactly {0, 1, 2}.
    let mut observed: Vec<u32> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            ConsumeOutcome::Content {
                remaining_views, ..
            } => Some(*remaining_views),
            _ => None,
        })
        .collect();
    observed.sort_unstable();
    assert_eq!(observed, vec![0, 1, 2]);
    assert!(store.is_empty().expect("is_empty"));
}

#[test]
fn unrelated_pastes_do_not_steal_each_others_budget() {
    let store = Arc::new(PasteStore::new());
    let first = create_paste(&store, "first", 300, 1);
    let second = create_paste(&store, "second", 300, 1);
    let now = Utc::now();

    let barrier = Arc::new(Barrier::new(4));
    let mut handles = Vec::new();
    for id in [&first.id, &second.id] {
        for _ in 0..2 {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let id = id.clone();
            handles.push(thread::spawn(move || {
                barrier.wait();
                (id.clone(), store.try_consume(&id, now).expect("consume"))
            }));
        }
    }

    let mut served_by_id: std::collections::HashMap<String, usize> =
        std::collections::HashMap::new();
    for handle in handles {
        let (id, outcome) = handle.join().expect("reader join");
        if matches!(outcome, ConsumeOutcome::Content { .. }) {
            *served_by_id.entry(id).or_default() += 1;
        }
    }

    assert_eq!(served_by_id.get(&first.id), Some(&1));
    assert_eq!(served_by_id.get(&second.id), Some(&1));
}

#[test]
fn sweep_racing_consume_never_serves_expired_content() {
    let store = Arc::new(PasteStore::new());

    for _ in 0..16 {
        let now = Utc::now();
        let record = store
            .create("stale".to_string(), 1, 5, now)
            .expect("create");
        let after_expiry = now + Duration::seconds(2);

        let barrier = Arc::new(Barrier::new(2));

        let consumer = {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let id = record.id.clone();
            thread::spawn(move || {
                barrier.wait();
                store.try_consume(&id, after_expiry).expect("consume")
            })
        };
        let sweeper = {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.sweep_expired(after_expiry).expect("sweep")
            })
        };

        let outcome = consumer.join().expect("consumer join");
        let removed = sweeper.join().expect("sweeper join");

        assert!(
            matches!(outcome, ConsumeOutcome::Expired | ConsumeOutcome::NotFound),
            "an expired paste must never be served, got {}",
            outcome.label()
        );
        assert!(removed <= 1, "a record is deleted at most once");
        assert!(store.peek(&record.id).expect("peek").is_none());
    }
}
