//! # Document contracts consumed by the worker.
//!
//! The queue never owns documents. It sees them through [`DocumentDirectory`],
//! an ordered view over whatever the host currently has open, and talks to a
//! single [`Document`] to resolve paragraph locales, run checks, and (when
//! the queue goes idle) ask for follow-up work.
//!
//! A check receives a [`CancellationToken`] and should poll it at paragraph
//! granularity: when the controller interrupts (stop, reset, dispose of the
//! checked document), the token is cancelled and the check is expected to
//! return [`CheckError::Canceled`] promptly. A check that cannot observe the
//! token is tolerated: the controller's bounded interrupt wait times out
//! and moves on.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    engine::EngineRef,
    entry::{CheckRequest, QueueEntry},
    error::CheckError,
    language::Locale,
};

/// Shared handle to a host document.
pub type DocumentRef = Arc<dyn Document>;

/// One open document of the host.
#[async_trait]
pub trait Document: Send + Sync {
    /// Stable identifier of this document.
    fn doc_id(&self) -> &str;

    /// Whether the host has already closed this document.
    ///
    /// Disposed documents are skipped by the follow-up probe.
    fn is_disposed(&self) -> bool;

    /// Locale of the paragraph at `n_start`, if the document still knows it.
    fn paragraph_locale(&self, n_start: i32) -> Option<Locale>;

    /// Produces the next unchecked range after `n_start` for rule set
    /// `n_cache`, or `None` when this document is fully checked.
    ///
    /// `n_start == -1` asks for the first unchecked range of the document.
    /// This is only called while the queue is otherwise idle.
    fn next_queue_entry(&self, n_start: i32, n_cache: i32) -> Option<QueueEntry>;

    /// Runs the check for one request with an already configured engine.
    ///
    /// Expected to poll `ctx` periodically and return
    /// [`CheckError::Canceled`] soon after it is cancelled.
    async fn run_check(
        &self,
        request: &CheckRequest,
        engine: &EngineRef,
        ctx: CancellationToken,
    ) -> Result<(), CheckError>;
}

/// Ordered view over the host's open documents.
///
/// The order is meaningful: it drives the round-robin follow-up probe,
/// which prefers the document of the last dispatched entry, then documents
/// after it, then documents before it.
pub trait DocumentDirectory: Send + Sync {
    /// Snapshot of the currently open documents, in host order.
    fn documents(&self) -> Vec<DocumentRef>;
}
