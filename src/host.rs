//! # The capability object handed to the queue at construction.
//!
//! [`CheckHost`] bundles the three collaborator contracts the worker needs:
//! the document directory, the locale-to-language registry, and the engine
//! factory. Hosts implement the three traits on one object and pass it as a
//! single [`CheckHostRef`]; the blanket impl below makes the bundle
//! automatic.

use std::sync::Arc;

use crate::{document::DocumentDirectory, engine::EngineFactory, language::LanguageRegistry};

/// Everything the worker needs from its host.
pub trait CheckHost: DocumentDirectory + LanguageRegistry + EngineFactory {}

impl<T> CheckHost for T where T: DocumentDirectory + LanguageRegistry + EngineFactory {}

/// Shared handle to the host capability object.
pub type CheckHostRef = Arc<dyn CheckHost>;
