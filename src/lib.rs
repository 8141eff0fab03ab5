//! launchrank: the ranking core of a keyboard-driven launcher
//!
//! Candidates come from pluggable sources, are scored against what the
//! user typed with a fuzzy relevance scorer, and are boosted by a learning
//! register that remembers what was picked for which query.

pub mod actions;
pub mod cache;
pub mod config;
pub mod learn;
pub mod objects;
pub mod relevance;
pub mod results;
pub mod search;
pub mod session;
pub mod shell;
pub mod sources;

pub use config::Settings;
pub use learn::LearningRegister;
pub use objects::{Object, ObjectKind, ObjectRef, Source, SourceRef, TextSource};
pub use results::Rankable;
pub use search::{SearchOptions, SearchResults, Searcher};
pub use session::{Session, SessionEvent};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
