//! Search options and result stream models

use crate::cache::{Cursor, ReplayBuffer};
use crate::objects::ObjectRef;
use crate::results::Rankable;
use std::collections::HashSet;
use std::fmt;

/// Per-candidate admission check applied before scoring
pub type ItemCheck<'s> = Box<dyn Fn(&ObjectRef) -> bool + 's>;

/// Transform applied lazily to each result as it is consumed
pub type Decorator<'s> = Box<dyn Fn(Rankable) -> Rankable + 's>;

/// How to run one search
pub struct SearchOptions<'s> {
    /// Merge results best first; otherwise keep source order
    pub score: bool,
    pub(crate) item_check: Option<ItemCheck<'s>>,
    pub(crate) decorator: Option<Decorator<'s>>,
}

impl Default for SearchOptions<'_> {
    fn default() -> Self {
        Self {
            score: true,
            item_check: None,
            decorator: None,
        }
    }
}

impl<'s> SearchOptions<'s> {
    /// Scored search with no item check and no decorator
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep source order instead of merging best first
    pub fn unscored() -> Self {
        Self {
            score: false,
            ..Self::default()
        }
    }

    /// Only admit candidates passing `check`
    pub fn with_item_check(mut self, check: impl Fn(&ObjectRef) -> bool + 's) -> Self {
        self.item_check = Some(Box::new(check));
        self
    }

    /// Decorate each result as it is pulled
    pub fn with_decorator(mut self, decorator: impl Fn(Rankable) -> Rankable + 's) -> Self {
        self.decorator = Some(Box::new(decorator));
        self
    }
}

impl fmt::Debug for SearchOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchOptions")
            .field("score", &self.score)
            .field("item_check", &self.item_check.is_some())
            .field("decorator", &self.decorator.is_some())
            .finish()
    }
}

/// Outcome of one search: the top result and a replayable stream of all
/// results.
///
/// The stream is filled lazily; `first` is just the head of it, so it is
/// also the first item yielded by [`SearchResults::matches`].
#[derive(Debug, Clone)]
pub struct SearchResults<'s> {
    first: Option<Rankable>,
    matches: ReplayBuffer<'s, Rankable>,
}

impl<'s> SearchResults<'s> {
    /// Wrap a result stream, pulling only its first item
    pub fn new<I>(stream: I) -> Self
    where
        I: IntoIterator<Item = Rankable>,
        I::IntoIter: 's,
    {
        let matches = ReplayBuffer::new(stream);
        let first = matches.cursor().next();
        Self { first, matches }
    }

    /// No results
    pub fn empty() -> Self {
        Self {
            first: None,
            matches: ReplayBuffer::empty(),
        }
    }

    /// The best (or, unscored, the first) result
    pub fn first(&self) -> Option<&Rankable> {
        self.first.as_ref()
    }

    /// All results from the start; each call replays independently
    pub fn matches(&self) -> Cursor<'s, Rankable> {
        self.matches.cursor()
    }

    /// Collect up to `n` results
    pub fn take(&self, n: usize) -> Vec<Rankable> {
        self.matches().take(n).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }
}

/// Streaming de-duplication by object key, first occurrence wins
pub struct Unique<I> {
    inner: I,
    seen: HashSet<String>,
}

impl<I> Unique<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            seen: HashSet::new(),
        }
    }
}

impl<I: Iterator<Item = Rankable>> Iterator for Unique<I> {
    type Item = Rankable;

    fn next(&mut self) -> Option<Rankable> {
        for rb in self.inner.by_ref() {
            if self.seen.insert(rb.key()) {
                return Some(rb);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Object, ObjectKind};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Named(&'static str);

    impl Object for Named {
        fn key(&self) -> String {
            format!("test:{}", self.0)
        }

        fn display(&self) -> String {
            self.0.to_string()
        }

        fn kind(&self) -> ObjectKind {
            ObjectKind::Text
        }
    }

    fn rankable(name: &'static str) -> Rankable {
        Rankable::new(Arc::new(Named(name)))
    }

    #[test]
    fn test_unique_keeps_first() {
        let items = vec![rankable("a").with_rank(1.0), rankable("b"), rankable("a").with_rank(9.0)];
        let unique: Vec<Rankable> = Unique::new(items.into_iter()).collect();
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].rank, 1.0);
        assert_eq!(unique[1].display, "b");
    }

    #[test]
    fn test_results_replay_includes_first() {
        let results = SearchResults::new(vec![rankable("a"), rankable("b")]);
        assert_eq!(results.first().unwrap().display, "a");
        let displays: Vec<String> = results.matches().map(|rb| rb.display).collect();
        assert_eq!(displays, vec!["a", "b"]);
        assert_eq!(results.take(1).len(), 1);
        assert_eq!(results.matches().count(), 2);
    }

    #[test]
    fn test_empty_results() {
        let results = SearchResults::empty();
        assert!(results.is_empty());
        assert_eq!(results.matches().count(), 0);
    }

    #[test]
    fn test_options_builder() {
        let options = SearchOptions::unscored().with_decorator(|rb| rb);
        assert!(!options.score);
        assert!(options.decorator.is_some());
        assert!(options.item_check.is_none());
        assert!(SearchOptions::new().score);
    }
}
