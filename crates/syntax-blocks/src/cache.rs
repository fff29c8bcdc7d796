use lru::LruCache;
use std::borrow::Borrow;
use std::hash::Hash;

/// Capacity-bounded map with least-recently-used eviction.
///
/// When a `set` grows the map past `limit`, entries are evicted from the
/// least-recently-used end until `round(limit * ratio)` remain. A ratio of 1
/// evicts one entry at a time; smaller ratios evict in batches.
pub struct RecencyCache<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
    limit: usize,
    ratio: f64,
}

impl<K: Hash + Eq, V> RecencyCache<K, V> {
    #[must_use]
    pub fn new(limit: usize, ratio: f64) -> Self {
        Self {
            entries: LruCache::unbounded(),
            limit,
            ratio: clamp_ratio(ratio),
        }
    }

    /// Cache that evicts exactly down to `limit`
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self::new(limit, 1.0)
    }

    /// Look up and mark as most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Look up without touching recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.peek(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains(key)
    }

    /// Insert or update; the entry becomes most recently used
    pub fn set(&mut self, key: K, value: V) {
        self.entries.put(key, value);
        self.check_trim();
    }

    /// Remove an entry, returning whether it existed
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key).is_some()
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.pop(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.check_trim();
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn set_ratio(&mut self, ratio: f64) {
        self.ratio = clamp_ratio(ratio);
        self.check_trim();
    }

    /// Keys from least to most recently used
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().rev().map(|(key, _)| key)
    }

    fn check_trim(&mut self) {
        if self.entries.len() > self.limit {
            let keep = (self.limit as f64 * self.ratio).round() as usize;
            self.trim_old(keep);
        }
    }

    fn trim_old(&mut self, keep: usize) {
        if keep == 0 {
            self.entries.clear();
            return;
        }
        while self.entries.len() > keep {
            if self.entries.pop_lru().is_none() {
                break;
            }
        }
    }
}

impl<K: Hash + Eq, V> std::fmt::Debug for RecencyCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecencyCache")
            .field("len", &self.entries.len())
            .field("limit", &self.limit)
            .field("ratio", &self.ratio)
            .finish()
    }
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        return 1.0;
    }
    ratio.clamp(0.0, 1.0)
}
