//! # The public façade of the check queue.
//!
//! [`CheckQueue`] is what the host integration talks to. Construction
//! spawns the worker; afterwards any number of concurrent producers may
//! [`submit`](CheckQueue::submit) paragraph ranges, and the host drives the
//! three out-of-band controls: [`stop`](CheckQueue::stop),
//! [`reset`](CheckQueue::reset) and [`dispose`](CheckQueue::dispose).
//!
//! Submissions are deduplicated twice: against the identity of the entry
//! the worker most recently popped (the running check already covers the
//! request), and against the pending buffer (an equal entry either absorbs
//! the newcomer or, when the newcomer carries the override bit, is replaced
//! by it, which under LIFO consumption schedules the request next).
//!
//! All operations return normally; failures and progress are observable
//! through the event bus and the status predicates.

use std::sync::Arc;

use crate::{
    bus::Bus,
    config::Config,
    entry::{CheckRequest, QueueEntry},
    event::{Event, EventKind},
    host::CheckHostRef,
    observer::Observer,
    state::{Admission, QueueState},
    worker::QueueWorker,
};

/// Single-consumer work queue scheduling incremental text checks.
pub struct CheckQueue {
    cfg: Config,
    state: Arc<QueueState>,
    bus: Bus,
}

impl CheckQueue {
    /// Creates the queue and starts its worker.
    ///
    /// `host` is the capability object the worker resolves documents,
    /// languages and engines through; `observers` receive every published
    /// [`Event`], each on its own listener task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(cfg: Config, host: CheckHostRef, observers: Vec<Arc<dyn Observer>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        for observer in observers {
            bus.attach(observer);
        }

        let state = Arc::new(QueueState::new());
        state.set_running(true);
        let worker = QueueWorker::new(Arc::clone(&state), host, bus.clone(), cfg.clone());
        tokio::spawn(worker.run());

        Self { cfg, state, bus }
    }

    /// Subscribes to the queue's event stream.
    pub fn events(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Schedules a re-check of paragraphs `[n_start, n_end)` of `doc_id`
    /// with rule set `n_cache` and depth marker `n_check`.
    ///
    /// Invalid requests (`n_start < 0`, `n_end <= n_start`, `n_cache < 0`,
    /// empty `doc_id`) are silently ignored. A request equal to the one the
    /// worker is currently servicing, or to a pending entry, is suppressed
    /// unless `override_running` promotes it.
    pub fn submit(
        &self,
        n_start: i32,
        n_end: i32,
        n_cache: i32,
        n_check: i32,
        doc_id: &str,
        override_running: bool,
    ) {
        let req = CheckRequest {
            n_start,
            n_end,
            n_cache,
            n_check,
            doc_id: doc_id.to_string(),
            override_running,
        };
        if !req.is_valid() {
            self.bus
                .publish(Event::now(EventKind::SubmitRejected).with_request(&req));
            return;
        }
        if !override_running && self.state.matches_last(&req) {
            // The running check already covers it.
            return;
        }
        match self.state.admit(req.clone()) {
            Admission::Coalesced => {
                self.bus
                    .publish(Event::now(EventKind::EntryCoalesced).with_request(&req));
                return;
            }
            Admission::Promoted => {
                self.bus
                    .publish(Event::now(EventKind::EntryPromoted).with_request(&req));
            }
            Admission::Added => {
                self.bus
                    .publish(Event::now(EventKind::EntryAdded).with_request(&req));
            }
        }
        self.state.wake();
    }

    /// Drains the queue and terminates the worker.
    ///
    /// Pending entries are discarded, the in-flight check is interrupted,
    /// and a stop sentinel is scheduled; once the worker consumes it,
    /// [`is_running`](CheckQueue::is_running) turns false. Idempotent.
    pub fn stop(&self) {
        if self.state.is_running() {
            self.state.clear_buffer();
            self.state.request_interrupt();
            self.bus.publish(Event::now(EventKind::StopRequested));
            // Appended in its own lock scope: a submission racing in between
            // lands after the sentinel and, being newer, is still serviced
            // first under LIFO.
            self.state.push_back(QueueEntry::Stop);
        }
        self.state.wake();
    }

    /// Drains the queue and schedules a fresh engine initialization.
    ///
    /// Waits (bounded) for a running check to acknowledge the interrupt,
    /// then forgets the configured language; the engine itself is rebuilt
    /// lazily by the next dispatched entry, never by `reset` itself.
    pub async fn reset(&self) {
        self.state.clear_buffer();
        if !self.state.is_waiting() && self.state.last_start() >= 0 {
            self.wait_for_interrupt().await;
        }
        self.bus.publish(Event::now(EventKind::ResetRequested));
        self.state.clear_buffer();
        self.state.clear_last_language();
        self.state.wake();
    }

    /// Removes every trace of a closed document from the queue.
    ///
    /// Pending entries for `doc_id` are discarded; if the in-flight check
    /// belongs to it, waits (bounded) for the interrupt acknowledgement and
    /// clears the last-document bookkeeping so the follow-up probe stops
    /// favoring it. The engine is left untouched.
    pub async fn dispose(&self, doc_id: &str) {
        self.bus
            .publish(Event::now(EventKind::DisposeRequested).with_doc(doc_id));
        self.state.remove_doc(doc_id);
        if !self.state.is_waiting() && self.state.last_start() >= 0 && self.state.last_doc_is(doc_id)
        {
            self.wait_for_interrupt().await;
            self.state.clear_last_doc();
        }
    }

    /// Whether the worker is alive (started and not yet stopped or dead).
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Whether the worker is parked on its wakeup condition.
    pub fn is_waiting(&self) -> bool {
        self.state.is_waiting()
    }

    /// Whether an interrupt is pending acknowledgement.
    pub fn is_interrupted(&self) -> bool {
        self.state.is_interrupted()
    }

    /// Interrupts the running check and spin-waits until the worker
    /// acknowledges by clearing the flag, up to the configured bound.
    ///
    /// On timeout the collaborator may still be running; an
    /// [`EventKind::InterruptTimeout`] is published and the caller proceeds.
    async fn wait_for_interrupt(&self) {
        self.state.request_interrupt();
        self.bus.publish(Event::now(EventKind::InterruptRequested));
        self.state.wake();
        let mut ticks = 0u32;
        while self.state.is_interrupted() && ticks < self.cfg.interrupt_wait_ticks {
            tokio::time::sleep(self.cfg.interrupt_tick).await;
            ticks += 1;
        }
        if self.state.is_interrupted() {
            self.bus.publish(
                Event::now(EventKind::InterruptTimeout)
                    .with_waited(self.cfg.interrupt_tick * ticks),
            );
        }
    }
}
