//! Lookup Table - immutable key → statistic mapping with a neutral default

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Key/value table that never fails on lookup.
///
/// Keys absent from the backing data resolve to `default`, so previously
/// unseen airlines and routes still produce a well-formed feature vector.
#[derive(Debug, Clone)]
pub struct LookupTable<K, V> {
    entries: HashMap<K, V>,
    default: V,
}

impl<K, V> LookupTable<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(default: V) -> Self {
        Self {
            entries: HashMap::new(),
            default,
        }
    }

    /// Build from records; the first record for a key wins
    pub fn from_records<I>(records: I, default: V) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut table = Self::new(default);
        for (key, value) in records {
            table.entries.entry(key).or_insert(value);
        }
        table
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    /// Resolve a key, falling back to the table default
    pub fn resolve<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}
