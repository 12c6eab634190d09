//! Ordered multi-valued map.
//!
//! The catalog API returns one collection row per owned edition, so a single
//! item id can carry several records. [`MultiMap`] keeps every value, in the
//! order it was inserted, and iterates keys in first-seen order so that all
//! downstream output is reproducible from the input order alone.

use std::hash::Hash;

use indexmap::IndexMap;

/// Key → ordered sequence of values. Keys iterate in first-insertion order.
#[derive(Debug, Clone)]
pub struct MultiMap<K, V> {
    entries: IndexMap<K, Vec<V>>,
}

impl<K: Hash + Eq, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, V> MultiMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`, keeping any values already stored there.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.entry(key).or_default().push(value);
    }

    /// All values stored under `key`, in insertion order. Empty if absent.
    pub fn get_all(&self, key: &K) -> &[V] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Distinct keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// `(key, values)` groups in first-insertion order of the key.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of stored values across all keys.
    pub fn total_len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for MultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
