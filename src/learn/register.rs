//! The learning register

use super::mnemonics::Mnemonics;
use crate::objects::Object;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Flat bonus for favorite objects
pub const FAVORITE_BONUS: f64 = 7.0;

/// Bonus for the remembered preferred action of a leaf
pub const CORRELATION_BONUS: f64 = 50.0;

/// Register size above which pruning kicks in
pub const DEFAULT_PRUNE_THRESHOLD: usize = 100;

/// Preferred actions known before any use has been recorded
pub const DEFAULT_CORRELATIONS: &[(&str, &str)] = &[
    ("app:org.gnome.Terminal.desktop", "action:launch-again"),
    ("app:org.gnome.Console.desktop", "action:launch-again"),
    ("app:org.kde.konsole.desktop", "action:launch-again"),
];

/// Usage memory biasing rankings toward what the user actually picks.
///
/// Holds per-object [`Mnemonics`], the preferred action per leaf and the
/// favorites set. One instance is owned per application session.
#[derive(Debug, Clone)]
pub struct LearningRegister {
    pub(super) entries: BTreeMap<String, Mnemonics>,
    pub(super) correlation: BTreeMap<String, String>,
    pub(super) favorites: BTreeSet<String>,
    prune_threshold: usize,
    dirty: bool,
}

impl Default for LearningRegister {
    fn default() -> Self {
        Self::new()
    }
}

impl LearningRegister {
    /// Fresh register with the default correlations
    pub fn new() -> Self {
        let mut register = Self::empty();
        register.seed_default_correlations();
        register
    }

    /// Register with nothing in it, not even default correlations
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            correlation: BTreeMap::new(),
            favorites: BTreeSet::new(),
            prune_threshold: DEFAULT_PRUNE_THRESHOLD,
            dirty: false,
        }
    }

    /// Set the size above which pruning runs
    pub fn with_prune_threshold(mut self, threshold: usize) -> Self {
        self.prune_threshold = threshold;
        self
    }

    pub(super) fn seed_default_correlations(&mut self) {
        for (leaf, action) in DEFAULT_CORRELATIONS {
            self.correlation.insert(leaf.to_string(), action.to_string());
        }
    }

    /// Record that `object` was picked after typing `key`
    pub fn record_hit(&mut self, object: &dyn Object, key: &str) {
        self.record_hit_key(&object.key(), key);
    }

    /// [`record_hit`](Self::record_hit) by object key
    pub fn record_hit_key(&mut self, object_key: &str, key: &str) {
        let key = key.to_lowercase();
        self.entries
            .entry(object_key.to_string())
            .or_default()
            .increment(&key);
        self.dirty = true;
        debug!("Recorded hit for {} (key {:?})", object_key, key);
    }

    /// Learned score of `object` for `key`
    pub fn get_score(&self, object: &dyn Object, key: &str) -> f64 {
        self.score_key(&object.key(), key)
    }

    /// [`get_score`](Self::get_score) by object key
    pub fn score_key(&self, object_key: &str, key: &str) -> f64 {
        let favorite = if self.favorites.contains(object_key) {
            FAVORITE_BONUS
        } else {
            0.0
        };
        match self.entries.get(object_key) {
            Some(mnemonics) => favorite + mnemonics.score(&key.to_lowercase()),
            None => favorite,
        }
    }

    /// Remember `action` as the preferred action for `leaf`
    pub fn set_correlation(&mut self, action: &dyn Object, leaf: &dyn Object) {
        self.correlation.insert(leaf.key(), action.key());
        self.dirty = true;
    }

    /// [`CORRELATION_BONUS`] if `action` is the preferred action for `leaf`, else 0
    pub fn get_correlation_bonus(&self, action: &dyn Object, leaf: &dyn Object) -> f64 {
        match self.correlation.get(&leaf.key()) {
            Some(preferred) if *preferred == action.key() => CORRELATION_BONUS,
            _ => 0.0,
        }
    }

    /// Key of the preferred action for `leaf_key`
    pub fn correlation(&self, leaf_key: &str) -> Option<&str> {
        self.correlation.get(leaf_key).map(String::as_str)
    }

    pub fn add_favorite(&mut self, object: &dyn Object) {
        if self.favorites.insert(object.key()) {
            self.dirty = true;
        }
    }

    pub fn remove_favorite(&mut self, object: &dyn Object) {
        if self.favorites.remove(&object.key()) {
            self.dirty = true;
        }
    }

    pub fn is_favorite(&self, object: &dyn Object) -> bool {
        self.favorites.contains(&object.key())
    }

    /// Keys of all favorites
    pub fn favorites(&self) -> impl Iterator<Item = &str> {
        self.favorites.iter().map(String::as_str)
    }

    /// Usage counters of `object`
    pub fn mnemonics(&self, object: &dyn Object) -> Option<&Mnemonics> {
        self.entries.get(&object.key())
    }

    /// Number of objects with recorded usage
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether anything changed since the last save or load
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(super) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Probabilistically forget old usage, see [`prune_with`](Self::prune_with)
    pub fn prune(&mut self) -> usize {
        self.prune_with(&mut rand::thread_rng())
    }

    /// Decay the register once it grows past the prune threshold.
    ///
    /// Each entry is decremented with probability `min(0.1, size / 25000)`;
    /// entries left without any count are removed. Returns the number of
    /// removed entries.
    pub fn prune_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let size = self.entries.len();
        if size <= self.prune_threshold {
            return 0;
        }

        let probability = (size as f64 / 25_000.0).min(0.1);
        let mut decremented = 0usize;
        self.entries.retain(|_, mnemonics| {
            if rng.gen_bool(probability) {
                mnemonics.decrement();
                decremented += 1;
            }
            mnemonics.is_in_use()
        });

        let removed = size - self.entries.len();
        if decremented > 0 || removed > 0 {
            self.dirty = true;
        }
        debug!(
            "Pruned register: {} of {} entries decremented, {} removed",
            decremented, size, removed
        );
        removed
    }
}
