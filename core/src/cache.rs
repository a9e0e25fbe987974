use std::collections::{BTreeMap, HashMap};

/// Default number of stems kept by a tokenizer.
pub const DEFAULT_STEM_CACHE_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
}

struct Entry {
    stem: String,
    last_access: u64,
}

/// Bounded raw-token -> stem map with least-recently-used eviction.
///
/// `recency` orders keys by their last access tick so eviction is a pop of
/// the smallest tick instead of a scan over every entry.
pub struct StemCache {
    capacity: usize,
    entries: HashMap<String, Entry>,
    recency: BTreeMap<u64, String>,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl StemCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity.min(DEFAULT_STEM_CACHE_CAPACITY)),
            recency: BTreeMap::new(),
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn stats(&self) -> CacheStats {
        CacheStats { hits: self.hits, misses: self.misses, len: self.entries.len() }
    }

    /// Look up `token`, counting a hit or a miss and refreshing its recency.
    pub fn get(&mut self, token: &str) -> Option<String> {
        self.tick += 1;
        let now = self.tick;
        match self.entries.get_mut(token) {
            Some(entry) => {
                self.hits += 1;
                self.recency.remove(&entry.last_access);
                entry.last_access = now;
                self.recency.insert(now, token.to_string());
                Some(entry.stem.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store `stem` for `token`, evicting the least recently used entries
    /// when full. A token stored in the meantime by another caller keeps
    /// its stem and only has its recency refreshed.
    pub fn insert(&mut self, token: &str, stem: String) {
        if self.capacity == 0 {
            return;
        }
        self.tick += 1;
        let now = self.tick;
        if let Some(entry) = self.entries.get_mut(token) {
            self.recency.remove(&entry.last_access);
            entry.last_access = now;
            self.recency.insert(now, token.to_string());
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.recency.pop_first() {
                Some((_, oldest)) => { self.entries.remove(&oldest); }
                None => break,
            }
        }
        self.entries.insert(token.to_string(), Entry { stem, last_access: now });
        self.recency.insert(now, token.to_string());
    }

    /// Return the cached stem for `token`, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(&mut self, token: &str, stem: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if let Some(hit) = self.get(token) {
            return hit;
        }
        let value = stem(token);
        self.insert(token, value.clone());
        value
    }

    pub fn contains(&self, token: &str) -> bool { self.entries.contains_key(token) }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }
}
