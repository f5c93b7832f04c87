//! # Queue configuration.
//!
//! [`Config`] defines the queue's behavior: event-bus capacity, the bounded
//! interrupt wait, the rule set activated after an engine initialization,
//! and whether the engine factory may recycle state across initializations.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use checkvisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.interrupt_tick = Duration::from_millis(2);
//! cfg.default_rule_set = 0;
//!
//! assert_eq!(cfg.interrupt_wait_ticks, checkvisor::MAX_INTERRUPT_WAIT);
//! ```

use std::time::Duration;

/// Upper bound on interrupt-wait iterations.
///
/// A controller operation that interrupts a running check spins in
/// [`Config::interrupt_tick`] steps and gives up after this many of them;
/// with the default 1 ms tick that is a two-second bound.
pub const MAX_INTERRUPT_WAIT: u32 = 2000;

/// Configuration for the check queue.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
    /// Maximum number of interrupt-wait iterations before giving up.
    pub interrupt_wait_ticks: u32,
    /// Sleep between interrupt-wait iterations.
    pub interrupt_tick: Duration,
    /// Rule set activated right after an engine is (re-)initialized.
    pub default_rule_set: i32,
    /// Passed through to [`EngineFactory::initialize`](crate::EngineFactory::initialize)
    /// as the `reuse` flag.
    pub reuse_engine: bool,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `bus_capacity = 1024`
    /// - `interrupt_wait_ticks = MAX_INTERRUPT_WAIT` (2000)
    /// - `interrupt_tick = 1ms`
    /// - `default_rule_set = 1`
    /// - `reuse_engine = false`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            interrupt_wait_ticks: MAX_INTERRUPT_WAIT,
            interrupt_tick: Duration::from_millis(1),
            default_rule_set: 1,
            reuse_engine: false,
        }
    }
}
