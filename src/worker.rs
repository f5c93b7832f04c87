//! # The dedicated queue consumer.
//!
//! [`QueueWorker`] is the single long-lived task that drains the buffer.
//! Per iteration it acknowledges any pending interrupt, pops the newest
//! entry (LIFO), reconfigures the engine if the entry's language or rule
//! set differs from what is currently loaded, and dispatches the check to
//! the owning document.
//!
//! When the buffer is empty the worker does not park right away: if it has
//! dispatched to a document before, it asks that document, and then its
//! siblings round-robin, for follow-up work. Only when no live document
//! offers anything does it set `waiting` and block on the wakeup condition.
//!
//! ```text
//!            ┌────────────┐ pop (LIFO)  ┌─────────────┐
//!  buffer ──►│ QueueWorker├────────────►│  Document   │
//!            └─────┬──────┘  run_check  └─────────────┘
//!                  │ empty
//!                  ▼
//!        next_follow_up(last_*)  ──hit──► push, continue
//!                  │ miss
//!                  ▼
//!             park on Notify
//! ```
//!
//! Collaborator failures are transient: they are published to the bus and
//! the loop continues. A panic escaping the loop is fatal: it is caught,
//! published as [`EventKind::WorkerPanicked`], and the worker terminates
//! with `running` cleared.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::{
    bus::Bus,
    config::Config,
    document::DocumentRef,
    engine::EngineRef,
    entry::{CheckRequest, QueueEntry},
    error::CheckError,
    event::{Event, EventKind},
    host::CheckHostRef,
    language::Language,
    state::QueueState,
};

pub(crate) struct QueueWorker {
    state: Arc<QueueState>,
    host: CheckHostRef,
    bus: Bus,
    cfg: Config,
    /// Worker-owned engine; rebuilt on language change, dropped on reset.
    engine: Option<EngineRef>,
}

impl QueueWorker {
    pub(crate) fn new(state: Arc<QueueState>, host: CheckHostRef, bus: Bus, cfg: Config) -> Self {
        Self {
            state,
            host,
            bus,
            cfg,
            engine: None,
        }
    }

    /// Entry point of the spawned worker task.
    pub(crate) async fn run(mut self) {
        let state = Arc::clone(&self.state);
        let bus = self.bus.clone();
        bus.publish(Event::now(EventKind::QueueStarted));

        let loop_fut = self.drive();
        if let Err(panic) = AssertUnwindSafe(loop_fut).catch_unwind().await {
            bus.publish(Event::now(EventKind::WorkerPanicked).with_error(format!("{panic:?}")));
            state.set_running(false);
        }
    }

    async fn drive(&mut self) {
        loop {
            self.state.begin_iteration();

            let Some(entry) = self.state.pop_back() else {
                if let Some((start, cache, doc_id)) = self.state.follow_up_hint() {
                    if let Some(entry) = self.next_follow_up(start, cache, &doc_id) {
                        self.state.push_back(entry);
                        continue;
                    }
                }
                self.bus.publish(Event::now(EventKind::QueueWaiting));
                self.state.park().await;
                continue;
            };

            match entry {
                QueueEntry::Stop => {
                    self.state.set_running(false);
                    self.bus.publish(Event::now(EventKind::QueueStopped));
                    return;
                }
                // Drained sentinels carry no work of their own.
                QueueEntry::Reset | QueueEntry::Dispose(_) => {}
                QueueEntry::Work(req) => self.run_work(req).await,
            }
        }
    }

    async fn run_work(&mut self, req: CheckRequest) {
        let Some(doc) = self.find_document(&req.doc_id) else {
            self.bus.publish(
                Event::now(EventKind::EntryDropped)
                    .with_request(&req)
                    .with_error("document is gone"),
            );
            return;
        };

        let Some(language) = self.resolve_language(&doc, req.n_start) else {
            let locale = doc
                .paragraph_locale(req.n_start)
                .map(|l| l.to_string())
                .unwrap_or_default();
            self.bus.publish(
                Event::now(EventKind::EntryDropped)
                    .with_request(&req)
                    .with_error(CheckError::UnknownLocale { locale }.to_string()),
            );
            return;
        };

        let engine = match self.configure_engine(&language, req.n_cache).await {
            Ok(engine) => engine,
            Err(err) => {
                self.bus.publish(
                    Event::now(EventKind::CheckFailed)
                        .with_request(&req)
                        .with_error(err.to_string()),
                );
                return;
            }
        };

        // Recorded before dispatch so concurrent submissions of the same
        // request are suppressed while it runs.
        self.state.record_last(&req);

        self.bus
            .publish(Event::now(EventKind::EntryDispatched).with_request(&req));
        let ctx = self.state.begin_check();
        let result = doc.run_check(&req, &engine, ctx).await;
        self.state.end_check();

        match result {
            Ok(()) => {}
            Err(CheckError::Canceled) => {
                self.bus
                    .publish(Event::now(EventKind::CheckCanceled).with_request(&req));
            }
            Err(err) => {
                self.bus.publish(
                    Event::now(EventKind::CheckFailed)
                        .with_request(&req)
                        .with_error(err.to_string()),
                );
            }
        }
    }

    /// Hands back an engine configured for `language` and rule set `n_cache`.
    ///
    /// The engine is rebuilt when the language changed (or after a reset
    /// cleared the configured language); a fresh engine gets warmed up for
    /// the host's current locale and starts on the default rule set. An
    /// engine kept across entries only has its rule set re-targeted when
    /// the cache index moved.
    async fn configure_engine(
        &mut self,
        language: &Language,
        n_cache: i32,
    ) -> Result<EngineRef, CheckError> {
        if let (Some(engine), Some(configured)) = (self.engine.clone(), self.state.last_language())
        {
            if &configured == language {
                if self.state.last_cache() != n_cache {
                    self.host.activate_rule_set(n_cache, &engine).await?;
                    self.bus
                        .publish(Event::now(EventKind::RuleSetActivated).with_cache(n_cache));
                }
                return Ok(engine);
            }
        }

        self.state.set_last_language(language.clone());
        // Drop the stale engine before building its replacement.
        self.engine = None;
        let engine = self.host.initialize(language, self.cfg.reuse_engine).await?;
        if let Some(locale) = self.host.current_locale() {
            self.host.warmup(&engine, &locale).await?;
        }
        self.host
            .activate_rule_set(self.cfg.default_rule_set, &engine)
            .await?;
        self.bus.publish(
            Event::now(EventKind::EngineInitialized).with_language(language.code.clone()),
        );
        self.engine = Some(Arc::clone(&engine));
        Ok(engine)
    }

    fn find_document(&self, doc_id: &str) -> Option<DocumentRef> {
        self.host
            .documents()
            .into_iter()
            .find(|doc| doc.doc_id() == doc_id)
    }

    fn resolve_language(&self, doc: &DocumentRef, n_start: i32) -> Option<Language> {
        let locale = doc.paragraph_locale(n_start)?;
        if !self.host.has_locale(&locale) {
            return None;
        }
        self.host.language_for(&locale)
    }

    /// Round-robin probe for follow-up work across the live documents.
    ///
    /// The document of the last dispatch is asked first, continuing from
    /// `(n_start, n_cache)`; after that, documents following it in host
    /// order, then the ones before it, each asked for their first unchecked
    /// range.
    fn next_follow_up(&self, n_start: i32, n_cache: i32, doc_id: &str) -> Option<QueueEntry> {
        let documents = self.host.documents();
        let mut n_doc = 0;
        for (n, doc) in documents.iter().enumerate() {
            if doc.doc_id() == doc_id && !doc.is_disposed() {
                if let Some(entry) = doc.next_queue_entry(n_start, n_cache) {
                    return Some(entry);
                }
                n_doc = n;
                break;
            }
        }
        for doc in documents.iter().skip(n_doc + 1) {
            if !doc.is_disposed() {
                if let Some(entry) = doc.next_queue_entry(-1, n_cache) {
                    return Some(entry);
                }
            }
        }
        for doc in documents.iter().take(n_doc) {
            if !doc.is_disposed() {
                if let Some(entry) = doc.next_queue_entry(-1, n_cache) {
                    return Some(entry);
                }
            }
        }
        None
    }
}
