//! # Observer trait and the built-in stdout logger.
//!
//! [`Observer`] is the extension point for consuming queue [`Event`]s:
//! logging, metrics, test probes. Observers are attached at queue
//! construction and each runs on its own listener task, so a slow observer
//! never blocks the worker.
//!
//! [`LoggerObserver`] (feature `logging`) prints events in a compact
//! human-readable form and is meant for development and demos only.

use async_trait::async_trait;

use crate::event::Event;
#[cfg(feature = "logging")]
use crate::event::EventKind;

/// Consumes queue events for observability.
#[async_trait]
pub trait Observer: Send + Sync {
    /// Called once per published event, in bus order.
    async fn on_event(&self, event: &Event);
}

/// Simple stdout logging observer.
///
/// Enabled via the `logging` feature. Not intended for production use;
/// implement a custom [`Observer`] for structured logging or metrics.
///
/// ## Output format
/// ```text
/// [added] doc=doc-1 start=0 end=5 cache=0
/// [dispatched] doc=doc-1 start=0 end=5 cache=0
/// [engine-initialized] language=en-US
/// [waiting]
/// [stopped]
/// ```
#[cfg(feature = "logging")]
pub struct LoggerObserver;

#[cfg(feature = "logging")]
#[async_trait]
impl Observer for LoggerObserver {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::QueueStarted => println!("[started]"),
            EventKind::QueueWaiting => println!("[waiting]"),
            EventKind::QueueStopped => println!("[stopped]"),
            EventKind::EntryAdded => {
                println!(
                    "[added] doc={:?} start={:?} end={:?} cache={:?}",
                    e.doc, e.start, e.end, e.cache
                );
            }
            EventKind::SubmitRejected => {
                println!(
                    "[rejected] doc={:?} start={:?} end={:?} cache={:?}",
                    e.doc, e.start, e.end, e.cache
                );
            }
            EventKind::EntryCoalesced => {
                println!("[coalesced] doc={:?} start={:?}", e.doc, e.start);
            }
            EventKind::EntryPromoted => {
                println!("[promoted] doc={:?} start={:?}", e.doc, e.start);
            }
            EventKind::EntryDispatched => {
                println!(
                    "[dispatched] doc={:?} start={:?} end={:?} cache={:?}",
                    e.doc, e.start, e.end, e.cache
                );
            }
            EventKind::EntryDropped => {
                println!("[dropped] doc={:?} err={:?}", e.doc, e.error);
            }
            EventKind::CheckCanceled => {
                println!("[canceled] doc={:?} start={:?}", e.doc, e.start);
            }
            EventKind::CheckFailed => {
                println!("[check-failed] doc={:?} err={:?}", e.doc, e.error);
            }
            EventKind::EngineInitialized => {
                println!("[engine-initialized] language={:?}", e.language);
            }
            EventKind::RuleSetActivated => {
                println!("[rule-set] cache={:?}", e.cache);
            }
            EventKind::StopRequested => println!("[stop-requested]"),
            EventKind::ResetRequested => println!("[reset-requested]"),
            EventKind::DisposeRequested => {
                println!("[dispose-requested] doc={:?}", e.doc);
            }
            EventKind::InterruptRequested => println!("[interrupt-requested]"),
            EventKind::InterruptTimeout => {
                println!("[interrupt-timeout] waited={:?}", e.waited);
            }
            EventKind::WorkerPanicked => {
                println!("[worker-panicked] err={:?}", e.error);
            }
        }
    }
}
