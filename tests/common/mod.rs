//! Shared mock host for the integration tests.
//!
//! [`MockHost`] implements the three collaborator contracts on one object
//! and records everything the queue does to it: dispatched checks, engine
//! initializations, rule-set activations, follow-up probes.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use checkvisor::{
    CheckEngine, CheckError, CheckRequest, Document, DocumentDirectory, DocumentRef, EngineFactory,
    EngineRef, Language, LanguageRegistry, Locale, QueueEntry,
};

/// Locale whose language is deliberately not registered.
pub const UNKNOWN_LANGUAGE: &str = "zz";

/// One recorded `run_check` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub doc_id: String,
    pub n_start: i32,
    pub n_end: i32,
    pub n_cache: i32,
    pub n_check: i32,
    pub override_running: bool,
}

impl Dispatch {
    fn of(req: &CheckRequest) -> Self {
        Self {
            doc_id: req.doc_id.clone(),
            n_start: req.n_start,
            n_end: req.n_end,
            n_cache: req.n_cache,
            n_check: req.n_check,
            override_running: req.override_running,
        }
    }
}

/// Collects dispatches across all mock documents.
#[derive(Default)]
pub struct Recorder {
    dispatches: Mutex<Vec<Dispatch>>,
}

impl Recorder {
    pub fn record(&self, d: Dispatch) {
        self.dispatches.lock().unwrap().push(d);
    }

    pub fn dispatches(&self) -> Vec<Dispatch> {
        self.dispatches.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.dispatches.lock().unwrap().len()
    }
}

pub struct MockEngine {
    pub language: Language,
}

impl CheckEngine for MockEngine {
    fn language(&self) -> &Language {
        &self.language
    }
}

pub struct MockDocument {
    id: String,
    locale: Locale,
    disposed: AtomicBool,
    check_delay: Duration,
    follow_ups: Mutex<VecDeque<QueueEntry>>,
    probes: Mutex<Vec<(i32, i32)>>,
    recorder: Arc<Recorder>,
}

impl MockDocument {
    pub fn set_disposed(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    /// Queues an entry to be served by the follow-up probe.
    pub fn add_follow_up(&self, entry: QueueEntry) {
        self.follow_ups.lock().unwrap().push_back(entry);
    }

    /// Arguments `next_queue_entry` was called with, in order.
    pub fn probes(&self) -> Vec<(i32, i32)> {
        self.probes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Document for MockDocument {
    fn doc_id(&self) -> &str {
        &self.id
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn paragraph_locale(&self, _n_start: i32) -> Option<Locale> {
        Some(self.locale.clone())
    }

    fn next_queue_entry(&self, n_start: i32, n_cache: i32) -> Option<QueueEntry> {
        self.probes.lock().unwrap().push((n_start, n_cache));
        self.follow_ups.lock().unwrap().pop_front()
    }

    async fn run_check(
        &self,
        request: &CheckRequest,
        _engine: &EngineRef,
        ctx: CancellationToken,
    ) -> Result<(), CheckError> {
        self.recorder.record(Dispatch::of(request));
        if self.check_delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = tokio::time::sleep(self.check_delay) => Ok(()),
            _ = ctx.cancelled() => Err(CheckError::Canceled),
        }
    }
}

/// Implements all three host contracts and records engine activity.
pub struct MockHost {
    docs: Mutex<Vec<Arc<MockDocument>>>,
    pub recorder: Arc<Recorder>,
    pub init_count: AtomicUsize,
    pub warmup_count: AtomicUsize,
    activations: Mutex<Vec<i32>>,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            docs: Mutex::new(Vec::new()),
            recorder: Arc::new(Recorder::default()),
            init_count: AtomicUsize::new(0),
            warmup_count: AtomicUsize::new(0),
            activations: Mutex::new(Vec::new()),
        })
    }

    pub fn add_doc(&self, id: &str, locale: Locale) -> Arc<MockDocument> {
        self.add_doc_with_delay(id, locale, Duration::ZERO)
    }

    /// A document whose checks block for `delay` unless cancelled, to keep
    /// the worker busy while a test stages the buffer.
    pub fn add_doc_with_delay(&self, id: &str, locale: Locale, delay: Duration) -> Arc<MockDocument> {
        let doc = Arc::new(MockDocument {
            id: id.to_string(),
            locale,
            disposed: AtomicBool::new(false),
            check_delay: delay,
            follow_ups: Mutex::new(VecDeque::new()),
            probes: Mutex::new(Vec::new()),
            recorder: Arc::clone(&self.recorder),
        });
        self.docs.lock().unwrap().push(Arc::clone(&doc));
        doc
    }

    pub fn inits(&self) -> usize {
        self.init_count.load(Ordering::SeqCst)
    }

    pub fn warmups(&self) -> usize {
        self.warmup_count.load(Ordering::SeqCst)
    }

    pub fn activations(&self) -> Vec<i32> {
        self.activations.lock().unwrap().clone()
    }
}

impl DocumentDirectory for MockHost {
    fn documents(&self) -> Vec<DocumentRef> {
        self.docs
            .lock()
            .unwrap()
            .iter()
            .map(|d| Arc::clone(d) as DocumentRef)
            .collect()
    }
}

impl LanguageRegistry for MockHost {
    fn has_locale(&self, locale: &Locale) -> bool {
        locale.language != UNKNOWN_LANGUAGE
    }

    fn language_for(&self, locale: &Locale) -> Option<Language> {
        if locale.language == UNKNOWN_LANGUAGE {
            return None;
        }
        Some(Language::new(locale.to_string()))
    }

    fn current_locale(&self) -> Option<Locale> {
        Some(Locale::new("en", "US", ""))
    }
}

#[async_trait]
impl EngineFactory for MockHost {
    async fn initialize(&self, language: &Language, _reuse: bool) -> Result<EngineRef, CheckError> {
        self.init_count.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockEngine {
            language: language.clone(),
        }))
    }

    async fn warmup(&self, _engine: &EngineRef, _locale: &Locale) -> Result<(), CheckError> {
        self.warmup_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn activate_rule_set(&self, index: i32, _engine: &EngineRef) -> Result<(), CheckError> {
        self.activations.lock().unwrap().push(index);
        Ok(())
    }
}

/// Polls `f` until it holds or `timeout` elapses; returns the final verdict.
pub async fn wait_until(timeout: Duration, mut f: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if f() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    f()
}

/// Waits until the recorder has seen at least `n` dispatches.
pub async fn wait_for_dispatches(recorder: &Recorder, n: usize) -> bool {
    wait_until(Duration::from_secs(2), || recorder.count() >= n).await
}

/// Lets in-flight queue activity settle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(80)).await;
}
