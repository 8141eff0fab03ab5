//! Per-object usage counters

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Usage counters of one object: an overall count and one count per search key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mnemonics {
    /// Independent running tally of all hits
    #[serde(rename = "count")]
    total_count: u32,
    /// Hits per (lowercased) search key
    #[serde(default, rename = "keys")]
    per_key_counts: BTreeMap<String, u32>,
}

impl Mnemonics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one hit, under `key` as well when it is not empty
    pub fn increment(&mut self, key: &str) {
        self.total_count = self.total_count.saturating_add(1);
        if !key.is_empty() {
            let count = self.per_key_counts.entry(key.to_string()).or_insert(0);
            *count = count.saturating_add(1);
        }
    }

    /// Forget a little: lower the least used key and the total by one
    pub fn decrement(&mut self) {
        // ties go to the lexicographically smallest key
        let least = self
            .per_key_counts
            .iter()
            .min_by_key(|(_, &count)| count)
            .map(|(key, &count)| (key.clone(), count));

        if let Some((key, count)) = least {
            if count <= 1 {
                self.per_key_counts.remove(&key);
            } else {
                self.per_key_counts.insert(key, count - 1);
            }
        }
        self.total_count = self.total_count.saturating_sub(1);
    }

    /// Whether any count is left
    pub fn is_in_use(&self) -> bool {
        self.total_count > 0 || !self.per_key_counts.is_empty()
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Hits recorded under exactly `key`
    pub fn count_for(&self, key: &str) -> u32 {
        self.per_key_counts.get(key).copied().unwrap_or(0)
    }

    /// Hits recorded under any key starting with `prefix`
    pub fn close_count(&self, prefix: &str) -> u32 {
        self.per_key_counts
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .fold(0u32, |sum, (_, &count)| sum.saturating_add(count))
    }

    /// Recorded keys with their counts
    pub fn keys(&self) -> impl Iterator<Item = (&str, u32)> {
        self.per_key_counts.iter().map(|(key, &count)| (key.as_str(), count))
    }

    /// Learned score for `key`: saturates toward 50 with no key and toward
    /// 80 for a key typed often.
    pub fn score(&self, key: &str) -> f64 {
        if key.is_empty() {
            return 50.0 * (1.0 - 1.0 / (f64::from(self.total_count) + 1.0));
        }
        let close = f64::from(self.close_count(key));
        let exact = f64::from(self.count_for(key));
        30.0 * (1.0 - 1.0 / (close + 1.0)) + 50.0 * (1.0 - 1.0 / (exact + 1.0))
    }
}
