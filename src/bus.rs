//! # Event bus for broadcasting queue events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] through which
//! the controller and the worker report [`Event`]s.
//!
//! - [`Bus::publish`] sends an event to all receivers (non-blocking).
//! - [`Bus::subscribe`] creates a new receiver for consuming events.
//! - [`Bus::attach`] spawns a listener task that feeds one
//!   [`Observer`](crate::Observer).
//!
//! Lagging receivers lose the oldest events; the queue itself never blocks
//! on observability.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{event::Event, observer::Observer};

/// Broadcast channel for queue events.
#[derive(Clone)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes an event to all receivers.
    ///
    /// Errors are ignored if there are no active receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Subscribes to the bus and returns a new receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Spawns a background task that delivers every event to `observer`.
    ///
    /// The task ends when the bus is dropped. Must be called from within a
    /// Tokio runtime.
    pub fn attach(&self, observer: Arc<dyn Observer>) {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => observer.on_event(&ev).await,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}
