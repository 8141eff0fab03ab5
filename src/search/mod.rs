//! Search orchestration module
//!
//! Runs one query across many sources, scores and merges the candidates,
//! and hands back a lazy, replayable result stream.

mod executor;
mod models;

pub use executor::Searcher;
pub use models::*;
