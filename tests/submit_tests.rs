//! Submission semantics: validation, coalescing, override promotion, LIFO
//! consumption, and engine reuse across dispatches.

mod common;

use std::sync::Arc;
use std::time::Duration;

use checkvisor::{CheckQueue, Config, Locale};

use common::{settle, wait_for_dispatches, wait_until, Dispatch, MockHost, UNKNOWN_LANGUAGE};

fn queue(host: &Arc<MockHost>) -> CheckQueue {
    CheckQueue::new(Config::default(), host.clone(), vec![])
}

fn en() -> Locale {
    Locale::new("en", "US", "")
}

#[tokio::test]
async fn simple_dispatch_initializes_engine_once() {
    let host = MockHost::new();
    host.add_doc("A", en());
    host.add_doc("B", en());
    let q = queue(&host);

    q.submit(0, 5, 0, 0, "A", false);

    assert!(wait_for_dispatches(&host.recorder, 1).await);
    settle().await;
    assert_eq!(
        host.recorder.dispatches(),
        vec![Dispatch {
            doc_id: "A".into(),
            n_start: 0,
            n_end: 5,
            n_cache: 0,
            n_check: 0,
            override_running: false,
        }]
    );
    assert_eq!(host.inits(), 1);
    assert_eq!(host.warmups(), 1);
    // A fresh engine starts on the default rule set.
    assert_eq!(host.activations(), vec![1]);
}

#[tokio::test]
async fn invalid_submissions_are_silently_ignored() {
    let host = MockHost::new();
    host.add_doc("A", en());
    let q = queue(&host);

    q.submit(-1, 5, 0, 0, "A", false);
    q.submit(5, 5, 0, 0, "A", false);
    q.submit(5, 2, 0, 0, "A", false);
    q.submit(0, 5, -1, 0, "A", false);
    q.submit(0, 5, 0, 0, "", false);

    settle().await;
    assert_eq!(host.recorder.count(), 0);
    assert!(q.is_running());
}

#[tokio::test]
async fn identical_submissions_coalesce_to_one_dispatch() {
    let host = MockHost::new();
    host.add_doc_with_delay("slow", en(), Duration::from_millis(300));
    host.add_doc("A", en());
    let q = queue(&host);

    // Keep the worker busy so the duplicates meet each other in the buffer.
    q.submit(0, 2, 0, 0, "slow", false);
    assert!(wait_for_dispatches(&host.recorder, 1).await);

    for _ in 0..10 {
        q.submit(0, 5, 0, 0, "A", false);
    }

    assert!(wait_for_dispatches(&host.recorder, 2).await);
    settle().await;
    assert_eq!(host.recorder.count(), 2);
    assert_eq!(host.recorder.dispatches()[1].doc_id, "A");
}

#[tokio::test]
async fn override_replaces_pending_equal_and_runs_once() {
    let host = MockHost::new();
    host.add_doc_with_delay("slow", en(), Duration::from_millis(300));
    host.add_doc("A", en());
    let q = queue(&host);

    q.submit(0, 2, 0, 0, "slow", false);
    assert!(wait_for_dispatches(&host.recorder, 1).await);

    q.submit(0, 5, 0, 0, "A", false);
    q.submit(0, 9, 0, 0, "A", true);

    assert!(wait_for_dispatches(&host.recorder, 2).await);
    settle().await;
    let dispatches = host.recorder.dispatches();
    assert_eq!(dispatches.len(), 2);
    assert_eq!(
        dispatches[1],
        Dispatch {
            doc_id: "A".into(),
            n_start: 0,
            n_end: 9,
            n_cache: 0,
            n_check: 0,
            override_running: true,
        }
    );
}

#[tokio::test]
async fn pending_entries_run_newest_first() {
    let host = MockHost::new();
    host.add_doc_with_delay("slow", en(), Duration::from_millis(300));
    host.add_doc("A", en());
    let q = queue(&host);

    q.submit(0, 2, 0, 0, "slow", false);
    assert!(wait_for_dispatches(&host.recorder, 1).await);

    q.submit(0, 5, 0, 0, "A", false);
    q.submit(10, 15, 0, 0, "A", false);
    q.submit(20, 25, 0, 0, "A", false);

    assert!(wait_for_dispatches(&host.recorder, 4).await);
    settle().await;
    let starts: Vec<i32> = host.recorder.dispatches()[1..]
        .iter()
        .map(|d| d.n_start)
        .collect();
    assert_eq!(starts, vec![20, 10, 0]);
}

#[tokio::test]
async fn request_equal_to_running_check_is_suppressed() {
    let host = MockHost::new();
    host.add_doc_with_delay("A", en(), Duration::from_millis(300));
    let q = queue(&host);

    q.submit(0, 5, 0, 0, "A", false);
    assert!(wait_for_dispatches(&host.recorder, 1).await);

    // Same identity, wider range: the running check already covers it.
    q.submit(0, 8, 0, 0, "A", false);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(host.recorder.count(), 1);
}

#[tokio::test]
async fn cache_switch_reactivates_rule_set_without_reinit() {
    let host = MockHost::new();
    host.add_doc("A", en());
    let q = queue(&host);

    q.submit(0, 5, 0, 0, "A", false);
    assert!(wait_for_dispatches(&host.recorder, 1).await);
    settle().await;

    q.submit(10, 15, 2, 0, "A", false);
    assert!(wait_for_dispatches(&host.recorder, 2).await);
    settle().await;

    assert_eq!(host.inits(), 1);
    assert_eq!(host.activations(), vec![1, 2]);
}

#[tokio::test]
async fn language_change_reinitializes_engine() {
    let host = MockHost::new();
    host.add_doc("A", en());
    host.add_doc("B", Locale::new("de", "DE", ""));
    let q = queue(&host);

    q.submit(0, 5, 0, 0, "A", false);
    assert!(wait_for_dispatches(&host.recorder, 1).await);
    settle().await;

    q.submit(0, 5, 0, 0, "B", false);
    assert!(wait_for_dispatches(&host.recorder, 2).await);
    settle().await;

    assert_eq!(host.inits(), 2);
    assert_eq!(host.activations(), vec![1, 1]);
}

#[tokio::test]
async fn unknown_locale_drops_entry_without_dispatch() {
    let host = MockHost::new();
    host.add_doc("U", Locale::new(UNKNOWN_LANGUAGE, "", ""));
    host.add_doc("A", en());
    let q = queue(&host);

    q.submit(0, 5, 0, 0, "U", false);
    settle().await;
    assert_eq!(host.recorder.count(), 0);
    assert_eq!(host.inits(), 0);

    // The queue keeps going afterwards.
    q.submit(0, 5, 0, 0, "A", false);
    assert!(wait_for_dispatches(&host.recorder, 1).await);
    assert_eq!(host.recorder.dispatches()[0].doc_id, "A");
}

#[tokio::test]
async fn worker_parks_once_drained() {
    let host = MockHost::new();
    host.add_doc("A", en());
    let q = queue(&host);

    assert!(wait_until(Duration::from_secs(2), || q.is_waiting()).await);

    q.submit(0, 5, 0, 0, "A", false);
    assert!(wait_for_dispatches(&host.recorder, 1).await);
    assert!(wait_until(Duration::from_secs(2), || q.is_waiting()).await);
    assert!(q.is_running());
}
