//! # Example: basic_check
//!
//! Demonstrates the full life of a check queue against a tiny in-memory
//! host: two documents, one submission, follow-up probing, and shutdown.
//!
//! Shows how to:
//! - Implement the host contracts (`Document`, `DocumentDirectory`,
//!   `LanguageRegistry`, `EngineFactory`) on one object
//! - Submit a paragraph range and watch it get dispatched
//! - Let the idle worker pull follow-up work from a sibling document
//! - Stop the queue and observe `is_running` flip
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► CheckQueue::new(cfg, host, observers)
//!   │     └─► worker starts, parks (nothing to do)
//!   │
//!   ├─► submit(0..4, report.odt)
//!   │     ├─► EngineInitialized (en-US)
//!   │     ├─► check runs on report.odt
//!   │     └─► idle → follow-up probe → notes.odt offers 0..2
//!   │
//!   └─► stop()
//!         └─► worker consumes the stop sentinel, is_running() == false
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_check
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use checkvisor::{
    CheckEngine, CheckError, CheckQueue, CheckRequest, Config, Document, DocumentDirectory,
    DocumentRef, EngineFactory, EngineRef, Event, EventKind, Language, LanguageRegistry, Locale,
    Observer, QueueEntry,
};

/// Engine stand-in: remembers its language, "checks" by sleeping briefly.
struct DemoEngine {
    language: Language,
}

impl CheckEngine for DemoEngine {
    fn language(&self) -> &Language {
        &self.language
    }
}

/// One in-memory document with a fixed number of paragraphs.
struct DemoDocument {
    id: String,
    paragraphs: i32,
    /// Ranges the follow-up probe may still hand out.
    unchecked: Mutex<Vec<(i32, i32)>>,
}

#[async_trait]
impl Document for DemoDocument {
    fn doc_id(&self) -> &str {
        &self.id
    }

    fn is_disposed(&self) -> bool {
        false
    }

    fn paragraph_locale(&self, n_start: i32) -> Option<Locale> {
        (n_start < self.paragraphs).then(|| Locale::new("en", "US", ""))
    }

    fn next_queue_entry(&self, _n_start: i32, n_cache: i32) -> Option<QueueEntry> {
        let (start, end) = self.unchecked.lock().unwrap().pop()?;
        Some(QueueEntry::work(start, end, n_cache, 0, self.id.clone(), false))
    }

    async fn run_check(
        &self,
        request: &CheckRequest,
        engine: &EngineRef,
        ctx: CancellationToken,
    ) -> Result<(), CheckError> {
        println!(
            "[{}] checking paragraphs {}..{} ({})",
            self.id,
            request.n_start,
            request.n_end,
            engine.language()
        );
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(40)) => Ok(()),
            _ = ctx.cancelled() => Err(CheckError::Canceled),
        }
    }
}

struct DemoHost {
    docs: Vec<Arc<DemoDocument>>,
}

impl DocumentDirectory for DemoHost {
    fn documents(&self) -> Vec<DocumentRef> {
        self.docs
            .iter()
            .map(|d| Arc::clone(d) as DocumentRef)
            .collect()
    }
}

impl LanguageRegistry for DemoHost {
    fn has_locale(&self, locale: &Locale) -> bool {
        locale.language == "en"
    }

    fn language_for(&self, locale: &Locale) -> Option<Language> {
        self.has_locale(locale).then(|| Language::new("en-US"))
    }

    fn current_locale(&self) -> Option<Locale> {
        Some(Locale::new("en", "US", ""))
    }
}

#[async_trait]
impl EngineFactory for DemoHost {
    async fn initialize(&self, language: &Language, _reuse: bool) -> Result<EngineRef, CheckError> {
        println!("[factory] building engine for {language}");
        Ok(Arc::new(DemoEngine {
            language: language.clone(),
        }))
    }

    async fn warmup(&self, _engine: &EngineRef, locale: &Locale) -> Result<(), CheckError> {
        println!("[factory] warming up for {locale}");
        Ok(())
    }

    async fn activate_rule_set(&self, index: i32, _engine: &EngineRef) -> Result<(), CheckError> {
        println!("[factory] activating rule set {index}");
        Ok(())
    }
}

/// Prints a one-liner per queue event.
struct Printer;

#[async_trait]
impl Observer for Printer {
    async fn on_event(&self, event: &Event) {
        match event.kind {
            EventKind::EntryDispatched => {
                println!(
                    "[queue] dispatched doc={:?} range={:?}..{:?}",
                    event.doc, event.start, event.end
                );
            }
            EventKind::QueueWaiting => println!("[queue] idle"),
            EventKind::QueueStopped => println!("[queue] stopped"),
            _ => {}
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== basic_check example ===\n");

    // 1. Build a host with two open documents; the second one has ranges
    //    the follow-up probe can hand out once the queue goes idle.
    let report = Arc::new(DemoDocument {
        id: "report.odt".into(),
        paragraphs: 12,
        unchecked: Mutex::new(Vec::new()),
    });
    let notes = Arc::new(DemoDocument {
        id: "notes.odt".into(),
        paragraphs: 6,
        unchecked: Mutex::new(vec![(0, 2), (2, 4)]),
    });
    let host = Arc::new(DemoHost {
        docs: vec![report, notes],
    });

    // 2. Start the queue with a printing observer.
    let queue = CheckQueue::new(Config::default(), host, vec![Arc::new(Printer)]);

    // 3. An edit arrived: re-check paragraphs 0..4 of the report.
    queue.submit(0, 4, 0, 0, "report.odt", false);

    // 4. Give the worker time to run the check and then drain the
    //    follow-up ranges of notes.odt on its own.
    tokio::time::sleep(Duration::from_millis(400)).await;

    // 5. Shut down.
    queue.stop();
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("\nrunning = {}", queue.is_running());
}
