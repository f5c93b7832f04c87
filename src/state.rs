//! # Shared queue state: the entry buffer and its bookkeeping.
//!
//! One mutex guards the ordered buffer together with the bookkeeping that
//! drives deduplication and the follow-up probe (`last_start`, `last_cache`,
//! `last_doc_id`, `last_language`, the in-flight check's cancellation
//! token). The lifecycle bits (`interrupt`, `running`, `waiting`) are
//! atomics, and the wakeup condition is a [`Notify`].
//!
//! Consumption is LIFO: the newest submission is serviced first, reflecting
//! edit recency. The lock is only ever held for buffer surgery, never
//! across an `.await`, a collaborator call, or the wakeup wait.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::{
    entry::{CheckRequest, DocId, QueueEntry},
    language::Language,
};

/// Outcome of the submission scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// No pending equal existed; the entry was appended.
    Added,
    /// A pending equal without the override bit was removed; the newcomer
    /// was appended, moving the request to the most-recent position.
    Promoted,
    /// A pending equal already covers the request; nothing was inserted.
    Coalesced,
}

struct Inner {
    buffer: Vec<QueueEntry>,
    /// Start paragraph of the most recently popped entry, -1 while parked.
    last_start: i32,
    /// Rule-set index of the most recently popped entry.
    last_cache: i32,
    /// Document of the most recently popped entry.
    last_doc_id: Option<DocId>,
    /// Language the engine is currently configured for.
    last_language: Option<Language>,
    /// Cancellation token of the in-flight check, if one is running.
    current_check: Option<CancellationToken>,
}

pub(crate) struct QueueState {
    inner: Mutex<Inner>,
    wakeup: Notify,
    interrupt: AtomicBool,
    running: AtomicBool,
    waiting: AtomicBool,
}

impl QueueState {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                buffer: Vec::new(),
                last_start: -1,
                last_cache: 0,
                last_doc_id: None,
                last_language: None,
                current_check: None,
            }),
            wakeup: Notify::new(),
            interrupt: AtomicBool::new(false),
            running: AtomicBool::new(false),
            waiting: AtomicBool::new(false),
        }
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        // The buffer stays usable even if a holder panicked mid-update.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ---- Buffer primitives ----

    /// Scans for a pending equal of `req` and decides what to do with it.
    ///
    /// On `Added` and `Promoted` the interrupt flag is cleared and the entry
    /// appended; `Coalesced` leaves the buffer untouched.
    pub(crate) fn admit(&self, req: CheckRequest) -> Admission {
        let entry = QueueEntry::Work(req);
        let mut inner = self.locked();
        let mut admission = Admission::Added;
        if let Some(pos) = inner.buffer.iter().position(|e| *e == entry) {
            let promotes = entry.as_work().is_some_and(|new| new.override_running)
                && inner.buffer[pos]
                    .as_work()
                    .is_some_and(|pending| !pending.override_running);
            if !promotes {
                return Admission::Coalesced;
            }
            inner.buffer.remove(pos);
            admission = Admission::Promoted;
        }
        self.interrupt.store(false, Ordering::SeqCst);
        inner.buffer.push(entry);
        admission
    }

    pub(crate) fn push_back(&self, entry: QueueEntry) {
        self.locked().buffer.push(entry);
    }

    /// Removes and returns the newest entry (LIFO).
    pub(crate) fn pop_back(&self) -> Option<QueueEntry> {
        self.locked().buffer.pop()
    }

    pub(crate) fn clear_buffer(&self) {
        self.locked().buffer.clear();
    }

    /// Removes every pending entry that refers to `doc_id`.
    pub(crate) fn remove_doc(&self, doc_id: &str) {
        self.locked()
            .buffer
            .retain(|e| e.doc_id() != Some(doc_id));
    }

    // ---- Bookkeeping ----

    /// Whether `req` repeats the identity of the most recently popped entry.
    pub(crate) fn matches_last(&self, req: &CheckRequest) -> bool {
        let inner = self.locked();
        inner.last_start == req.n_start
            && inner.last_cache == req.n_cache
            && inner.last_doc_id.as_deref() == Some(req.doc_id.as_str())
    }

    /// Records the popped entry's identity before dispatch, so concurrent
    /// submissions of the same request are suppressed while it runs.
    pub(crate) fn record_last(&self, req: &CheckRequest) {
        let mut inner = self.locked();
        inner.last_doc_id = Some(req.doc_id.clone());
        inner.last_start = req.n_start;
        inner.last_cache = req.n_cache;
    }

    /// Seed for the follow-up probe, if a document was dispatched to since
    /// the worker last parked.
    pub(crate) fn follow_up_hint(&self) -> Option<(i32, i32, DocId)> {
        let inner = self.locked();
        let doc_id = inner.last_doc_id.clone()?;
        Some((inner.last_start, inner.last_cache, doc_id))
    }

    pub(crate) fn last_start(&self) -> i32 {
        self.locked().last_start
    }

    pub(crate) fn last_cache(&self) -> i32 {
        self.locked().last_cache
    }

    pub(crate) fn last_doc_is(&self, doc_id: &str) -> bool {
        self.locked().last_doc_id.as_deref() == Some(doc_id)
    }

    pub(crate) fn clear_last_doc(&self) {
        self.locked().last_doc_id = None;
    }

    pub(crate) fn last_language(&self) -> Option<Language> {
        self.locked().last_language.clone()
    }

    pub(crate) fn set_last_language(&self, language: Language) {
        self.locked().last_language = Some(language);
    }

    /// Forgets the configured language; the next check re-initializes the
    /// engine.
    pub(crate) fn clear_last_language(&self) {
        self.locked().last_language = None;
    }

    // ---- Worker lifecycle ----

    /// Start of a worker iteration: the worker is live and any previous
    /// interrupt is acknowledged.
    pub(crate) fn begin_iteration(&self) {
        self.waiting.store(false, Ordering::SeqCst);
        self.interrupt.store(false, Ordering::SeqCst);
    }

    /// Blocks until a producer signals the wakeup condition.
    ///
    /// Returns immediately if entries arrived between the caller's empty
    /// check and this call; the pending-notify permit of [`Notify`] covers
    /// the remaining race.
    pub(crate) async fn park(&self) {
        let notified = self.wakeup.notified();
        {
            let mut inner = self.locked();
            if !inner.buffer.is_empty() {
                return;
            }
            inner.last_start = -1;
            self.waiting.store(true, Ordering::SeqCst);
        }
        notified.await;
    }

    pub(crate) fn wake(&self) {
        self.wakeup.notify_one();
    }

    // ---- Interrupt handshake ----

    /// Asks the in-flight check to abort: sets the flag and cancels the
    /// current check's token. The worker acknowledges by clearing the flag
    /// at the top of its next iteration.
    pub(crate) fn request_interrupt(&self) {
        self.interrupt.store(true, Ordering::SeqCst);
        let token = self.locked().current_check.clone();
        if let Some(token) = token {
            token.cancel();
        }
    }

    /// Issues the cancellation token for one dispatch.
    ///
    /// Pre-cancelled if an interrupt raced in before the check started.
    pub(crate) fn begin_check(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if self.interrupt.load(Ordering::SeqCst) {
            token.cancel();
        }
        self.locked().current_check = Some(token.clone());
        token
    }

    pub(crate) fn end_check(&self) {
        self.locked().current_check = None;
    }

    // ---- Status bits ----

    pub(crate) fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    pub(crate) fn is_waiting(&self) -> bool {
        self.waiting.load(Ordering::SeqCst)
    }
}
