//! Object and source capability traits

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Broad category of an object, used by actions to decide what they apply to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    File,
    Directory,
    Application,
    Url,
    Text,
    Action,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
            Self::Application => write!(f, "application"),
            Self::Url => write!(f, "url"),
            Self::Text => write!(f, "text"),
            Self::Action => write!(f, "action"),
        }
    }
}

/// Anything that can be ranked and activated: leaves and actions alike
pub trait Object: fmt::Debug + Send + Sync {
    /// Stable canonical identity.
    ///
    /// Two objects with the same key are the same object: results are
    /// de-duplicated on it and the learning register files usage under it,
    /// so it must not change between runs.
    fn key(&self) -> String;

    /// Name shown to the user and matched against the query
    fn display(&self) -> String;

    /// Object category
    fn kind(&self) -> ObjectKind;

    /// Alternative names that may also match the query
    fn aliases(&self) -> Vec<String> {
        vec![]
    }

    /// Whether the object still refers to something that exists
    fn is_valid(&self) -> bool {
        true
    }

    /// Intrinsic rank bias, only meaningful for actions
    fn rank_adjust(&self) -> i32 {
        0
    }

    /// Secondary line of text
    fn description(&self) -> Option<String> {
        None
    }
}

/// Shared handle to an object
pub type ObjectRef = Arc<dyn Object>;

/// Materialized candidate pool handed over by a catalog source
pub type Leaves = Box<dyn Iterator<Item = ObjectRef>>;

/// Catalog source: a query-independent collection of objects
///
/// Enumeration may be expensive; the searcher caches the pool between
/// keystrokes and only calls [`Source::leaves`] again when the query stops
/// extending the previous one.
pub trait Source: Send + Sync {
    /// Unique source identifier
    fn id(&self) -> &str;

    /// Human readable name
    fn name(&self) -> &str {
        self.id()
    }

    /// Enumerate all objects of this source
    fn leaves(&self) -> Leaves;
}

/// Text interpreter: produces objects from the query itself
pub trait TextSource: Send + Sync {
    /// Unique source identifier
    fn id(&self) -> &str;

    /// Objects this source derives from `key`
    fn text_items(&self, key: &str) -> Vec<ObjectRef>;

    /// Fixed priority used instead of text similarity
    fn rank(&self) -> Option<i32> {
        None
    }
}

/// A source handed to the searcher for one query
#[derive(Clone, Copy)]
pub enum SourceRef<'a> {
    Catalog(&'a dyn Source),
    Text(&'a dyn TextSource),
}

impl<'a> SourceRef<'a> {
    /// Identifier of the underlying source
    pub fn id(&self) -> &'a str {
        match *self {
            Self::Catalog(source) => source.id(),
            Self::Text(source) => source.id(),
        }
    }
}

impl fmt::Debug for SourceRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(source) => write!(f, "Catalog({})", source.id()),
            Self::Text(source) => write!(f, "Text({})", source.id()),
        }
    }
}
