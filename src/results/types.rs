//! Result type definitions

use crate::objects::{Object, ObjectRef};
use std::fmt;

/// One candidate ranked for one query
#[derive(Clone)]
pub struct Rankable {
    /// Text shown to the user; may be switched to a better matching alias
    pub display: String,
    /// The backing object
    pub object: ObjectRef,
    /// Rank for the current query
    pub rank: f64,
    /// Alternative names of the object
    pub aliases: Vec<String>,
}

impl Rankable {
    /// Wrap an object with rank 0
    pub fn new(object: ObjectRef) -> Self {
        Self {
            display: object.display(),
            aliases: object.aliases(),
            object,
            rank: 0.0,
        }
    }

    /// Set the rank
    pub fn with_rank(mut self, rank: f64) -> Self {
        self.rank = rank;
        self
    }

    /// Identity key of the backing object
    pub fn key(&self) -> String {
        self.object.key()
    }

    /// The backing object as a trait object
    pub fn object(&self) -> &dyn Object {
        self.object.as_ref()
    }
}

impl fmt::Debug for Rankable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rankable")
            .field("display", &self.display)
            .field("key", &self.object.key())
            .field("rank", &self.rank)
            .finish()
    }
}
