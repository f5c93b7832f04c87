//! # Queue lifecycle events.
//!
//! The queue reports everything it does (submissions, dispatches, engine
//! re-initializations, interrupts, failures) as [`Event`]s on the
//! [`Bus`](crate::Bus). Producers are never handed an error directly; the
//! bus plus the status predicates are the whole observable surface.
//!
//! Each event carries a globally unique, monotonically increasing `seq`
//! number, so consumers can re-establish ordering even when events are
//! delivered through async channels.
//!
//! ## Typical flows
//!
//! ### Accepted submission
//! ```text
//! submit()
//!   → EntryAdded
//!   → EntryDispatched
//! ```
//!
//! ### Language change
//! ```text
//! EntryDispatched (doc in new language)
//!   → EngineInitialized
//!   → RuleSetActivated (default slot)
//! ```
//!
//! ### Dispose with an in-flight check
//! ```text
//! dispose(doc)
//!   → DisposeRequested
//!   → InterruptRequested
//!   → CheckCanceled        (the running check acknowledged)
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::entry::CheckRequest;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of queue events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Queue lifecycle ===
    /// The worker entered its loop.
    QueueStarted,
    /// The buffer is empty and no follow-up work was available; the worker
    /// is blocked on its wakeup condition.
    QueueWaiting,
    /// The worker consumed the stop sentinel and terminated.
    QueueStopped,

    // === Submissions ===
    /// A submission passed validation and was appended to the buffer.
    EntryAdded,
    /// A submission violated the preconditions and was ignored.
    SubmitRejected,
    /// A submission equal to a pending entry was suppressed.
    EntryCoalesced,
    /// An overriding submission replaced its pending equal, moving the
    /// request to the most-recent position.
    EntryPromoted,

    // === Dispatch ===
    /// The worker handed an entry to its document for checking.
    EntryDispatched,
    /// An entry was discarded before dispatch (unknown locale, or the
    /// document is gone).
    EntryDropped,
    /// The running check observed the interrupt and returned early.
    CheckCanceled,
    /// The engine or the document reported a failure; the worker continues.
    CheckFailed,

    // === Engine ===
    /// A fresh engine was initialized for a language.
    EngineInitialized,
    /// A rule set was activated on the running engine.
    RuleSetActivated,

    // === Controls ===
    /// `stop()` drained the buffer and scheduled the stop sentinel.
    StopRequested,
    /// `reset()` drained the buffer; the next check re-initializes the engine.
    ResetRequested,
    /// `dispose()` removed a document's pending entries.
    DisposeRequested,
    /// A controller operation asked the running check to abort.
    InterruptRequested,
    /// The running check did not acknowledge the interrupt within the bound.
    InterruptTimeout,

    // === Terminal ===
    /// A panic escaped the worker loop; the worker is gone.
    WorkerPanicked,
}

/// Queue event with optional metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp (may go backwards, use for logging only).
    pub at: SystemTime,
    /// The kind of event.
    pub kind: EventKind,
    /// Document the event refers to, if any.
    pub doc: Option<String>,
    /// First paragraph of the affected range.
    pub start: Option<i32>,
    /// One past the last paragraph of the affected range.
    pub end: Option<i32>,
    /// Rule-set index, if relevant.
    pub cache: Option<i32>,
    /// Language code, if relevant.
    pub language: Option<String>,
    /// Error text, if the event represents a failure.
    pub error: Option<String>,
    /// How long an interrupt wait lasted, if relevant.
    pub waited: Option<Duration>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            doc: None,
            start: None,
            end: None,
            cache: None,
            language: None,
            error: None,
            waited: None,
        }
    }

    /// Attaches a document id.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Attaches a paragraph range.
    pub fn with_range(mut self, start: i32, end: i32) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Attaches a rule-set index.
    pub fn with_cache(mut self, cache: i32) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Attaches a language code.
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }

    /// Attaches an error message.
    pub fn with_error(mut self, msg: impl Into<String>) -> Self {
        self.error = Some(msg.into());
        self
    }

    /// Attaches the duration of an interrupt wait.
    pub fn with_waited(mut self, d: Duration) -> Self {
        self.waited = Some(d);
        self
    }

    /// Convenience: document, range and cache of one request in one call.
    pub fn with_request(self, req: &CheckRequest) -> Self {
        self.with_doc(req.doc_id.clone())
            .with_range(req.n_start, req.n_end)
            .with_cache(req.n_cache)
    }
}
