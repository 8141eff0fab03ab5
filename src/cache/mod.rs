//! Caching for candidate enumeration
//!
//! Catalog sources can be expensive to enumerate, so the searcher keeps each
//! source's unscored candidate pool for as long as the user keeps extending
//! the same query.

mod replay;

pub use replay::{Cursor, ReplayBuffer};

use crate::objects::{ObjectRef, Source};
use std::collections::HashMap;
use tracing::debug;

/// Candidate pool of one catalog source
pub type Pool = ReplayBuffer<'static, ObjectRef>;

/// Identity of a catalog source: where it lives plus its id.
///
/// Ids alone are not unique, two sources may share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PoolKey {
    addr: usize,
    id: String,
}

impl PoolKey {
    fn of(source: &dyn Source) -> Self {
        Self {
            addr: source as *const dyn Source as *const () as usize,
            id: source.id().to_string(),
        }
    }
}

/// Per-source candidate pools, valid while the query only grows
#[derive(Debug, Default)]
pub struct PrefixCache {
    pools: HashMap<PoolKey, Pool>,
    last_key: Option<String>,
}

impl PrefixCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the cache to a new key.
    ///
    /// Keeps the stored pools when `key` extends the previous key and drops
    /// all of them otherwise. Returns whether the pools were kept.
    pub fn advance(&mut self, key: &str) -> bool {
        let keep = matches!(&self.last_key, Some(last) if key.starts_with(last.as_str()));
        if !keep && !self.pools.is_empty() {
            debug!(
                "Key {:?} does not extend {:?}, dropping {} cached pools",
                key,
                self.last_key,
                self.pools.len()
            );
            self.pools.clear();
        }
        self.last_key = Some(key.to_string());
        keep
    }

    /// Replay cursor over the pool of `source`, enumerating it on first use
    pub fn pool(&mut self, source: &dyn Source) -> Cursor<'static, ObjectRef> {
        self.pools
            .entry(PoolKey::of(source))
            .or_insert_with(|| {
                debug!("Enumerating source {}", source.id());
                ReplayBuffer::new(source.leaves())
            })
            .cursor()
    }

    /// Whether a pool for `source` is currently cached
    pub fn contains(&self, source: &dyn Source) -> bool {
        self.pools.contains_key(&PoolKey::of(source))
    }

    /// Drop all pools and forget the last key
    pub fn clear(&mut self) {
        self.pools.clear();
        self.last_key = None;
    }

    /// Number of cached pools
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Check if no pool is cached
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
