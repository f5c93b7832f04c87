//! # Error types used by the check queue.
//!
//! [`CheckError`] covers everything that can go wrong between popping an
//! entry and finishing its check. None of these errors ever reach a
//! producer: `submit` and the control operations always return normally,
//! and failures surface as [`Event`](crate::Event)s on the bus plus the
//! status predicates.
//!
//! `Canceled` is not a failure in the traditional sense: it signals that a
//! running check observed the interrupt flag and returned early.

use std::time::Duration;

use thiserror::Error;

/// Errors produced while preparing or running a check.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CheckError {
    /// The paragraph locale has no registered language; the entry is
    /// dropped without dispatch.
    #[error("no registered language for locale '{locale}'")]
    UnknownLocale {
        /// Display form of the unresolved locale.
        locale: String,
    },

    /// The engine factory failed to build an engine for a language.
    #[error("engine initialization failed: {reason}")]
    EngineInit { reason: String },

    /// The engine or the document failed mid-check; the worker logs it and
    /// continues with the next entry.
    #[error("check failed: {reason}")]
    Fail { reason: String },

    /// Non-recoverable error; the worker terminates.
    #[error("fatal error (worker stops): {reason}")]
    Fatal { reason: String },

    /// The running check did not acknowledge the interrupt within the
    /// configured bound; the caller proceeds regardless.
    #[error("interrupt not acknowledged within {waited:?}")]
    InterruptTimeout { waited: Duration },

    /// The check observed the interrupt flag and returned early.
    ///
    /// This is intentional termination, not a failure.
    #[error("check canceled")]
    Canceled,
}

impl CheckError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CheckError::UnknownLocale { .. } => "check_unknown_locale",
            CheckError::EngineInit { .. } => "check_engine_init",
            CheckError::Fail { .. } => "check_failed",
            CheckError::Fatal { .. } => "check_fatal",
            CheckError::InterruptTimeout { .. } => "check_interrupt_timeout",
            CheckError::Canceled => "check_canceled",
        }
    }

    /// Indicates whether the worker keeps going after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckError::UnknownLocale { .. }
                | CheckError::EngineInit { .. }
                | CheckError::Fail { .. }
                | CheckError::InterruptTimeout { .. }
        )
    }

    /// Indicates whether the error terminates the worker.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CheckError::Fatal { .. })
    }
}
