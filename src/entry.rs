//! # Queue entries: check requests and control sentinels.
//!
//! A [`QueueEntry`] is either a unit of check work ([`CheckRequest`]) or a
//! control sentinel (`Stop`, `Reset`, `Dispose`). Control sentinels travel
//! on the same buffer as work so they are ordered against the submissions
//! that preceded them.
//!
//! ## Identity
//!
//! Two work entries are considered the same request when they agree on
//! `(n_start, n_cache, n_check, doc_id)`. The end of the range and the
//! override bit are *not* part of the identity: the document re-reads
//! paragraph bounds at dispatch time, so two requests covering different
//! ranges of the same start paragraph collapse into one.
//!
//! Control sentinels compare equal to nothing, including themselves, which
//! is why this type implements [`PartialEq`] but not `Eq`.
//!
//! ## Example
//! ```
//! use checkvisor::{QueueEntry, NO_FLAG, STOP_FLAG};
//!
//! let work = QueueEntry::work(0, 5, 0, 0, "doc-1", false);
//! let wider = QueueEntry::work(0, 12, 0, 0, "doc-1", true);
//!
//! // Same start paragraph, cache and document: same request.
//! assert_eq!(work, wider);
//! assert_eq!(work.control_flag(), NO_FLAG);
//! assert_eq!(QueueEntry::Stop.control_flag(), STOP_FLAG);
//! ```

/// Identifier of an open document, assigned by the host.
pub type DocId = String;

/// Flag value of a plain work entry.
pub const NO_FLAG: i32 = 0;
/// Flag value of the reset sentinel.
pub const RESET_FLAG: i32 = 1;
/// Flag value of the stop sentinel.
pub const STOP_FLAG: i32 = 2;
/// Flag value of the dispose sentinel.
pub const DISPOSE_FLAG: i32 = 3;

/// A request to re-check one paragraph range of one document.
///
/// `n_start`/`n_end` are paragraph indices (`n_start >= 0`, `n_end > n_start`),
/// `n_cache` selects the rule set the engine must have active, and `n_check`
/// is an engine-opaque depth marker passed through unchanged.
///
/// `override_running` asserts that this request must preempt a semantically
/// equal pending request: the older entry is removed and the newcomer is
/// appended, which under LIFO consumption makes it the next one serviced.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    /// First paragraph of the range.
    pub n_start: i32,
    /// One past the last paragraph of the range.
    pub n_end: i32,
    /// Rule-set index the engine must have active for this check.
    pub n_cache: i32,
    /// Engine-opaque depth/scope marker.
    pub n_check: i32,
    /// Document the range belongs to.
    pub doc_id: DocId,
    /// Preempt a semantically equal pending request.
    pub override_running: bool,
}

impl CheckRequest {
    /// Returns `true` if the request satisfies the submission preconditions.
    pub fn is_valid(&self) -> bool {
        self.n_start >= 0
            && self.n_end > self.n_start
            && self.n_cache >= 0
            && !self.doc_id.is_empty()
    }

    /// Identity comparison: `n_end` and `override_running` are excluded.
    pub fn same_request(&self, other: &CheckRequest) -> bool {
        self.n_start == other.n_start
            && self.n_cache == other.n_cache
            && self.n_check == other.n_check
            && self.doc_id == other.doc_id
    }
}

/// One element of the check queue: work, or a control sentinel.
#[derive(Debug, Clone)]
pub enum QueueEntry {
    /// Check a paragraph range of a document.
    Work(CheckRequest),
    /// Terminate the worker.
    Stop,
    /// Re-initialize the engine before the next check.
    Reset,
    /// All state of the named document is gone.
    Dispose(DocId),
}

impl QueueEntry {
    /// Creates a work entry. This is the factory used by documents producing
    /// follow-up entries and by hosts building requests by hand.
    pub fn work(
        n_start: i32,
        n_end: i32,
        n_cache: i32,
        n_check: i32,
        doc_id: impl Into<DocId>,
        override_running: bool,
    ) -> Self {
        QueueEntry::Work(CheckRequest {
            n_start,
            n_end,
            n_cache,
            n_check,
            doc_id: doc_id.into(),
            override_running,
        })
    }

    /// Stable numeric identifier of the entry kind.
    ///
    /// These values are part of the public contract: [`NO_FLAG`],
    /// [`RESET_FLAG`], [`STOP_FLAG`], [`DISPOSE_FLAG`].
    pub fn control_flag(&self) -> i32 {
        match self {
            QueueEntry::Work(_) => NO_FLAG,
            QueueEntry::Reset => RESET_FLAG,
            QueueEntry::Stop => STOP_FLAG,
            QueueEntry::Dispose(_) => DISPOSE_FLAG,
        }
    }

    /// The document this entry refers to, if any.
    pub fn doc_id(&self) -> Option<&str> {
        match self {
            QueueEntry::Work(req) => Some(&req.doc_id),
            QueueEntry::Dispose(doc_id) => Some(doc_id),
            QueueEntry::Stop | QueueEntry::Reset => None,
        }
    }

    /// Returns the inner request of a work entry.
    pub fn as_work(&self) -> Option<&CheckRequest> {
        match self {
            QueueEntry::Work(req) => Some(req),
            _ => None,
        }
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (QueueEntry::Work(a), QueueEntry::Work(b)) => a.same_request(b),
            // Control sentinels have no identity.
            _ => false,
        }
    }
}
