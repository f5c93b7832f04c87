//! # checkvisor
//!
//! **Checkvisor** is a single-consumer work queue that schedules incremental
//! re-checks of text paragraphs across the open documents of an editing
//! session.
//!
//! Producers (edit events, UI threads) submit paragraph ranges; a dedicated
//! worker coalesces, orders (newest first) and runs them against a heavy
//! linguistic engine that is rebuilt lazily whenever the language or rule
//! set of the entry at hand changes. Three out-of-band controls interrupt
//! the flow: stop, full reset, and dispose-by-document.
//!
//! ## Features
//!
//! | Area            | Description                                                        | Key types / traits                        |
//! |-----------------|--------------------------------------------------------------------|-------------------------------------------|
//! | **Queue**       | Submit, deduplicate and LIFO-consume check requests.               | [`CheckQueue`], [`QueueEntry`]             |
//! | **Host API**    | Contracts the embedding editor implements.                         | [`Document`], [`CheckHost`]                |
//! | **Engine**      | Lazy, language-keyed engine lifecycle, worker-owned.               | [`EngineFactory`], [`CheckEngine`]         |
//! | **Observer API**| Hook into queue events (logging, metrics, test probes).            | [`Observer`], [`Event`]                    |
//! | **Errors**      | Typed errors for engine and check failures.                        | [`CheckError`]                             |
//! | **Configuration**| Centralize bus capacity, interrupt bounds, rule-set defaults.     | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LoggerObserver`] _(demo/reference only)_.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//!
//! use checkvisor::{
//!     CheckEngine, CheckError, CheckQueue, CheckRequest, Config, Document, DocumentDirectory,
//!     DocumentRef, EngineFactory, EngineRef, Language, LanguageRegistry, Locale, QueueEntry,
//! };
//!
//! struct PlainEngine(Language);
//!
//! impl CheckEngine for PlainEngine {
//!     fn language(&self) -> &Language {
//!         &self.0
//!     }
//! }
//!
//! struct Page;
//!
//! #[async_trait]
//! impl Document for Page {
//!     fn doc_id(&self) -> &str {
//!         "doc-1"
//!     }
//!     fn is_disposed(&self) -> bool {
//!         false
//!     }
//!     fn paragraph_locale(&self, _n_start: i32) -> Option<Locale> {
//!         Some(Locale::new("en", "US", ""))
//!     }
//!     fn next_queue_entry(&self, _n_start: i32, _n_cache: i32) -> Option<QueueEntry> {
//!         None
//!     }
//!     async fn run_check(
//!         &self,
//!         request: &CheckRequest,
//!         _engine: &EngineRef,
//!         _ctx: CancellationToken,
//!     ) -> Result<(), CheckError> {
//!         println!("checking paragraphs {}..{}", request.n_start, request.n_end);
//!         Ok(())
//!     }
//! }
//!
//! struct Host;
//!
//! impl DocumentDirectory for Host {
//!     fn documents(&self) -> Vec<DocumentRef> {
//!         vec![Arc::new(Page)]
//!     }
//! }
//!
//! impl LanguageRegistry for Host {
//!     fn has_locale(&self, _locale: &Locale) -> bool {
//!         true
//!     }
//!     fn language_for(&self, _locale: &Locale) -> Option<Language> {
//!         Some(Language::new("en-US"))
//!     }
//!     fn current_locale(&self) -> Option<Locale> {
//!         Some(Locale::new("en", "US", ""))
//!     }
//! }
//!
//! #[async_trait]
//! impl EngineFactory for Host {
//!     async fn initialize(
//!         &self,
//!         language: &Language,
//!         _reuse: bool,
//!     ) -> Result<EngineRef, CheckError> {
//!         Ok(Arc::new(PlainEngine(language.clone())))
//!     }
//!     async fn warmup(&self, _engine: &EngineRef, _locale: &Locale) -> Result<(), CheckError> {
//!         Ok(())
//!     }
//!     async fn activate_rule_set(
//!         &self,
//!         _index: i32,
//!         _engine: &EngineRef,
//!     ) -> Result<(), CheckError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let queue = CheckQueue::new(Config::default(), Arc::new(Host), vec![]);
//!
//!     // An edit arrived: re-check paragraphs 0..5 of doc-1 with rule set 0.
//!     queue.submit(0, 5, 0, 0, "doc-1", false);
//!
//!     tokio::time::sleep(Duration::from_millis(50)).await;
//!     queue.stop();
//! }
//! ```
//!
//! ---

mod bus;
mod config;
mod controller;
mod document;
mod engine;
mod entry;
mod error;
mod event;
mod host;
mod language;
mod observer;
mod state;
mod worker;

// ---- Public re-exports ----

pub use bus::Bus;
pub use config::{Config, MAX_INTERRUPT_WAIT};
pub use controller::CheckQueue;
pub use document::{Document, DocumentDirectory, DocumentRef};
pub use engine::{CheckEngine, EngineFactory, EngineRef};
pub use entry::{CheckRequest, DocId, QueueEntry, DISPOSE_FLAG, NO_FLAG, RESET_FLAG, STOP_FLAG};
pub use error::CheckError;
pub use event::{Event, EventKind};
pub use host::{CheckHost, CheckHostRef};
pub use language::{Language, LanguageRegistry, Locale};
pub use observer::Observer;

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observer::LoggerObserver;
