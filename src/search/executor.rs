//! Search execution across sources

use super::models::{Decorator, SearchOptions, SearchResults, Unique};
use crate::cache::PrefixCache;
use crate::learn::LearningRegister;
use crate::objects::{Object, ObjectRef, SourceRef};
use crate::results::{
    add_fixed_rank, bonus_actions, bonus_objects, make_rankables, merge_best_first,
    score_actions, score_text, Rankable,
};
use std::rc::Rc;
use tracing::debug;

type RankedStream<'s> = Box<dyn Iterator<Item = Rankable> + 's>;

/// Searcher that ranks candidates from many sources for one key at a time.
///
/// The only state kept between calls is the prefix cache of catalog pools.
#[derive(Debug, Default)]
pub struct Searcher {
    cache: PrefixCache,
}

impl Searcher {
    /// Create a searcher with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Search `sources` for `key`.
    ///
    /// Catalog pools are enumerated once and reused while `key` keeps
    /// extending the previous key; text sources are asked again every time.
    /// Scoring happens eagerly, but de-duplication, validity filtering and
    /// decoration run only as the returned stream is consumed.
    pub fn search<'s>(
        &mut self,
        register: &LearningRegister,
        sources: &[SourceRef<'_>],
        key: &str,
        options: SearchOptions<'s>,
    ) -> SearchResults<'s> {
        if sources.is_empty() {
            return SearchResults::empty();
        }

        // Text sources interpret the query as typed; everything else is case-insensitive
        let typed = key;
        let key = key.to_lowercase();
        self.cache.advance(&key);

        let SearchOptions {
            score,
            item_check,
            decorator,
        } = options;
        let item_check: Rc<dyn Fn(&ObjectRef) -> bool + 's> = match item_check {
            Some(check) => Rc::from(check),
            None => Rc::new(|_: &ObjectRef| true),
        };

        let mut pools: Vec<RankedStream<'s>> = Vec::with_capacity(sources.len());
        for source in sources {
            let check = Rc::clone(&item_check);
            let pool: RankedStream<'s> = match *source {
                SourceRef::Catalog(catalog) => {
                    let candidates = self.cache.pool(catalog).filter(move |obj| check(obj));
                    if key.is_empty() {
                        Box::new(make_rankables(candidates))
                    } else {
                        let mut ranked: Vec<Rankable> =
                            score_text(make_rankables(candidates), &key).collect();
                        bonus_objects(&mut ranked, register, &key);
                        Box::new(ranked.into_iter())
                    }
                }
                SourceRef::Text(text) => {
                    let candidates = text.text_items(typed).into_iter().filter(move |obj| check(obj));
                    let ranked: Vec<Rankable> = match text.rank() {
                        Some(fixed) => {
                            let mut ranked: Vec<Rankable> = make_rankables(candidates).collect();
                            add_fixed_rank(&mut ranked, f64::from(fixed));
                            ranked
                        }
                        None if key.is_empty() => make_rankables(candidates).collect(),
                        None => {
                            let mut ranked: Vec<Rankable> =
                                score_text(make_rankables(candidates), &key).collect();
                            bonus_objects(&mut ranked, register, &key);
                            ranked
                        }
                    };
                    Box::new(ranked.into_iter())
                }
            };
            pools.push(pool);
        }

        debug!(
            "Searching {} sources for {:?} ({} pools cached)",
            sources.len(),
            key,
            self.cache.len()
        );

        let merged: RankedStream<'s> = if score {
            let (_, all) = merge_best_first(pools);
            Box::new(all.into_iter())
        } else {
            Box::new(pools.into_iter().flatten())
        };

        SearchResults::new(finish(merged, decorator))
    }

    /// Rank `actions` applicable to `leaf` for `key`.
    ///
    /// With an empty key actions are ordered by intrinsic bias, correlation
    /// with `leaf` and learned use; otherwise by text relevance plus learned
    /// use and bias.
    pub fn rank_actions<'s>(
        &self,
        register: &LearningRegister,
        actions: &[ObjectRef],
        key: &str,
        leaf: &dyn Object,
        decorator: Option<Decorator<'s>>,
    ) -> SearchResults<'s> {
        if actions.is_empty() {
            return SearchResults::empty();
        }

        let key = key.to_lowercase();
        let rankables = make_rankables(actions.iter().cloned());
        let ranked: Vec<Rankable> = if key.is_empty() {
            let mut ranked: Vec<Rankable> = rankables.collect();
            score_actions(&mut ranked, register, leaf);
            ranked
        } else {
            let mut ranked: Vec<Rankable> = score_text(rankables, &key).collect();
            bonus_actions(&mut ranked, register, &key);
            ranked
        };

        let (_, all) = merge_best_first([ranked]);
        SearchResults::new(finish(Box::new(all.into_iter()), decorator))
    }

    /// Drop all cached pools, e.g. after the catalog changed
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    /// Number of catalog pools currently cached
    pub fn cached_sources(&self) -> usize {
        self.cache.len()
    }
}

/// De-duplicate, drop invalid objects and decorate, all lazily
fn finish<'s>(
    merged: RankedStream<'s>,
    decorator: Option<Decorator<'s>>,
) -> RankedStream<'s> {
    let stream = Unique::new(merged).filter(|rb| rb.object.is_valid());
    match decorator {
        Some(decorate) => Box::new(stream.map(move |rb| decorate(rb))),
        None => Box::new(stream),
    }
}
