//! # Engine handle and factory contract.
//!
//! The linguistic engine is heavy to build and strictly worker-owned:
//! producers submit work and never touch it. The worker asks the
//! [`EngineFactory`] for a fresh engine whenever the language of the entry
//! at hand differs from the one the current engine was built for, and asks
//! it to re-target the rule set when only the cache index changed.
//!
//! [`CheckEngine`] itself is opaque to the queue: it is created by the
//! factory, threaded through [`Document::run_check`](crate::Document::run_check),
//! and dropped on re-initialization.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::CheckError,
    language::{Language, Locale},
};

/// Shared handle to an initialized engine.
pub type EngineRef = Arc<dyn CheckEngine>;

/// Opaque handle to an engine configured for one language.
pub trait CheckEngine: Send + Sync {
    /// The language this engine was initialized for.
    fn language(&self) -> &Language;
}

/// Builds and reconfigures engines on behalf of the worker.
#[async_trait]
pub trait EngineFactory: Send + Sync {
    /// Builds an engine for the given language.
    ///
    /// `reuse` asks the factory to recycle internal state from a previous
    /// engine where it can; the queue passes its configured value through
    /// unchanged.
    async fn initialize(&self, language: &Language, reuse: bool) -> Result<EngineRef, CheckError>;

    /// Primes a freshly built engine for the host's current locale.
    async fn warmup(&self, engine: &EngineRef, locale: &Locale) -> Result<(), CheckError>;

    /// Activates the rule set with the given index on a running engine.
    async fn activate_rule_set(&self, index: i32, engine: &EngineRef) -> Result<(), CheckError>;
}
