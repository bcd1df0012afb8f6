//! The contract shared by every ordered map backend.
//!
//! Code written against `OrderedMap` can swap one backend for another
//! and see the same results, only the cost of each operation differs.
use crate::{
    error::{Error, Result},
    map::AvlMap,
};
use std::collections::BTreeMap;

pub trait OrderedMap<K: Ord + Clone, V> {
    /// number of bindings in the map
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// the value bound to key, or `Error::NotFound`
    fn value(&self, key: &K) -> Result<&V>;

    /// the value bound to key, for update in place, or `Error::NotFound`
    fn value_mut(&mut self, key: &K) -> Result<&mut V>;

    /// bind key to value, returning the value it replaced, if any
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// unbind key, returning its value. A missing key is
    /// `Error::NotFound`, and the map is unchanged.
    fn erase(&mut self, key: &K) -> Result<V>;

    fn contains(&self, key: &K) -> bool;

    /// keys k with lo <= k <= hi in ascending order, empty if lo > hi
    fn find_keys(&self, lo: &K, hi: &K) -> Vec<K>;

    /// every key in ascending order
    fn sorted_keys(&self) -> Vec<K>;
}

impl<K: Ord + Clone, V> OrderedMap<K, V> for AvlMap<K, V> {
    fn len(&self) -> usize {
        AvlMap::len(self)
    }

    fn value(&self, key: &K) -> Result<&V> {
        AvlMap::value(self, key)
    }

    fn value_mut(&mut self, key: &K) -> Result<&mut V> {
        AvlMap::value_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        AvlMap::insert(self, key, value)
    }

    fn erase(&mut self, key: &K) -> Result<V> {
        AvlMap::erase(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    fn find_keys(&self, lo: &K, hi: &K) -> Vec<K> {
        AvlMap::find_keys(self, lo, hi)
    }

    fn sorted_keys(&self) -> Vec<K> {
        AvlMap::sorted_keys(self)
    }
}

impl<K: Ord + Clone, V> OrderedMap<K, V> for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn value(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::NotFound)
    }

    fn value_mut(&mut self, key: &K) -> Result<&mut V> {
        self.get_mut(key).ok_or(Error::NotFound)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        BTreeMap::insert(self, key, value)
    }

    fn erase(&mut self, key: &K) -> Result<V> {
        self.remove(key).ok_or(Error::NotFound)
    }

    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    fn find_keys(&self, lo: &K, hi: &K) -> Vec<K> {
        // BTreeMap::range panics on an inverted range
        if lo > hi {
            return Vec::new();
        }
        self.range(lo..=hi).map(|(k, _)| k.clone()).collect()
    }

    fn sorted_keys(&self) -> Vec<K> {
        self.keys().cloned().collect()
    }
}
