//! # Locale and language value types, and the registry contract.
//!
//! A [`Locale`] identifies what a paragraph is written in as reported by the
//! host editor (language / country / variant triple). A [`Language`] is the
//! engine-side identity the registry resolves a locale to; the worker
//! re-initializes the engine whenever the resolved language of the entry at
//! hand differs from the one the engine is configured for.

use std::fmt;

/// Paragraph locale as reported by the host editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    /// ISO language code, e.g. `"de"`.
    pub language: String,
    /// ISO country code, may be empty.
    pub country: String,
    /// Host-specific variant tag, may be empty.
    pub variant: String,
}

impl Locale {
    /// Creates a locale from its three components.
    pub fn new(
        language: impl Into<String>,
        country: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            country: country.into(),
            variant: variant.into(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if !self.country.is_empty() {
            write!(f, "-{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "-{}", self.variant)?;
        }
        Ok(())
    }
}

/// Engine-side language identity.
///
/// Equality on the code is what decides whether a running engine can be
/// reused for the next check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// Short code with country and variant, e.g. `"en-US"`.
    pub code: String,
}

impl Language {
    /// Creates a language from its short code.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Maps host locales onto engine languages.
///
/// Implemented by the host alongside [`DocumentDirectory`](crate::DocumentDirectory)
/// and [`EngineFactory`](crate::EngineFactory); see [`CheckHost`](crate::CheckHost).
pub trait LanguageRegistry: Send + Sync {
    /// Whether a registered language exists for this locale.
    fn has_locale(&self, locale: &Locale) -> bool;

    /// Resolves a locale to its language, if registered.
    fn language_for(&self, locale: &Locale) -> Option<Language>;

    /// The locale the host currently presents, used to warm up a freshly
    /// initialized engine.
    fn current_locale(&self) -> Option<Locale>;
}
