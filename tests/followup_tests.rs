//! Round-robin follow-up probing: once the buffer drains, the worker pulls
//! opportunistic work from the last-served document, then from its
//! siblings in directory order.

mod common;

use std::sync::Arc;
use std::time::Duration;

use checkvisor::{CheckQueue, Config, Locale, QueueEntry};

use common::{settle, wait_for_dispatches, wait_until, MockHost};

fn queue(host: &Arc<MockHost>) -> CheckQueue {
    CheckQueue::new(Config::default(), host.clone(), vec![])
}

fn en() -> Locale {
    Locale::new("en", "US", "")
}

#[tokio::test]
async fn idle_worker_pulls_follow_up_from_sibling() {
    let host = MockHost::new();
    let a = host.add_doc("A", en());
    let b = host.add_doc("B", en());
    b.add_follow_up(QueueEntry::work(0, 3, 0, 0, "B", false));

    let q = queue(&host);
    q.submit(0, 5, 0, 0, "A", false);

    assert!(wait_for_dispatches(&host.recorder, 2).await);
    settle().await;

    let dispatches = host.recorder.dispatches();
    assert_eq!(dispatches[0].doc_id, "A");
    assert_eq!(dispatches[1].doc_id, "B");
    assert_eq!((dispatches[1].n_start, dispatches[1].n_end), (0, 3));

    // The last-served document continues from where it stopped; siblings
    // are asked for their first unchecked range.
    assert_eq!(a.probes().first(), Some(&(0, 0)));
    assert_eq!(b.probes().first(), Some(&(-1, 0)));

    // Same language throughout: the engine was built exactly once.
    assert_eq!(host.inits(), 1);
    assert!(q.is_running());
}

#[tokio::test]
async fn follow_up_in_new_language_reinitializes_engine() {
    let host = MockHost::new();
    host.add_doc("A", en());
    let b = host.add_doc("B", Locale::new("de", "DE", ""));
    b.add_follow_up(QueueEntry::work(0, 3, 0, 0, "B", false));

    let q = queue(&host);
    q.submit(0, 5, 0, 0, "A", false);

    assert!(wait_for_dispatches(&host.recorder, 2).await);
    settle().await;
    assert_eq!(host.inits(), 2);
    assert_eq!(host.activations(), vec![1, 1]);
    assert!(q.is_running());
}

#[tokio::test]
async fn probe_wraps_around_directory_order() {
    let host = MockHost::new();
    let a = host.add_doc("A", en());
    host.add_doc("B", en());
    let c = host.add_doc("C", en());
    a.add_follow_up(QueueEntry::work(0, 3, 0, 0, "A", false));
    c.add_follow_up(QueueEntry::work(0, 3, 0, 0, "C", false));

    let q = queue(&host);
    q.submit(0, 5, 0, 0, "B", false);

    assert!(wait_for_dispatches(&host.recorder, 3).await);
    settle().await;

    // After B: probe continues with C (after it), then wraps to A.
    let dispatches = host.recorder.dispatches();
    let order: Vec<&str> = dispatches.iter().map(|d| d.doc_id.as_str()).collect();
    assert_eq!(order, vec!["B", "C", "A"]);
    assert!(wait_until(Duration::from_secs(2), || q.is_waiting()).await);
}

#[tokio::test]
async fn disposed_documents_are_never_probed() {
    let host = MockHost::new();
    host.add_doc("A", en());
    let b = host.add_doc("B", en());
    b.add_follow_up(QueueEntry::work(0, 3, 0, 0, "B", false));
    b.set_disposed();

    let q = queue(&host);
    q.submit(0, 5, 0, 0, "A", false);

    assert!(wait_for_dispatches(&host.recorder, 1).await);
    assert!(wait_until(Duration::from_secs(2), || q.is_waiting()).await);
    assert_eq!(host.recorder.count(), 1);
    assert!(b.probes().is_empty());
}
