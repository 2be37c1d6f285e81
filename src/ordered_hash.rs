//! Insertion-ordered associative container
//!
//! `OrderedHash` is what the map/reduce engine returns: keys keep the order
//! in which they were first pushed, and values can be looked up either by
//! key or by position.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::hash::Hash;

/// Key/value store that remembers key insertion order.
///
/// Invariants:
/// - every key appears at most once in the order
/// - `push` on an existing key replaces its value in place
/// - `insert` of an existing key does nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedHash<K, V>
where
    K: Eq + Hash,
{
    keys: Vec<K>,
    vals: HashMap<K, V>,
}

impl<K, V> Default for OrderedHash<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            vals: HashMap::new(),
        }
    }
}

impl<K, V> OrderedHash<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair, or overwrite the value of an existing key
    /// without moving it.
    pub fn push(&mut self, key: K, value: V) {
        if !self.vals.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.vals.insert(key, value);
    }

    /// Insert a new key at `index` (clamped to the current length).
    ///
    /// Inserting a key that is already present is a no-op; its value is
    /// left untouched.
    pub fn insert(&mut self, index: usize, key: K, value: V) {
        if self.vals.contains_key(&key) {
            return;
        }
        let index = index.min(self.keys.len());
        self.keys.insert(index, key.clone());
        self.vals.insert(key, value);
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.vals.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.vals.get_mut(key)
    }

    /// Value for `key`, appending `default()` first if the key is new
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        if !self.vals.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.vals.entry(key).or_insert_with(default)
    }

    /// Value stored under the key at position `index`
    pub fn at(&self, index: usize) -> Option<&V> {
        self.keys.get(index).and_then(|k| self.vals.get(k))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.vals.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in order. The slice is read-only so callers cannot reorder it.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Key at position `index`
    pub fn key(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    /// Values in key order
    pub fn values(&self) -> Vec<&V> {
        self.keys.iter().filter_map(|k| self.vals.get(k)).collect()
    }

    /// Apply `func` to every entry in order and collect the results
    pub fn map<R, F>(&self, mut func: F) -> Vec<R>
    where
        F: FnMut(&K, &V) -> R,
    {
        self.iter().map(|(k, v)| func(k, v)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.keys
            .iter()
            .filter_map(move |k| self.vals.get(k).map(|v| (k, v)))
    }

    /// The raw key/value mapping, without ordering guarantees
    pub fn unsorted_dict(&self) -> &HashMap<K, V> {
        &self.vals
    }
}

impl<K, V> IntoIterator for OrderedHash<K, V>
where
    K: Eq + Hash,
{
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        let mut vals = self.vals;
        self.keys
            .into_iter()
            .filter_map(|k| vals.remove(&k).map(|v| (k, v)))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedHash<K, V>
where
    K: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut hash = Self::new();
        for (k, v) in iter {
            hash.push(k, v);
        }
        hash
    }
}

impl<K, V> Serialize for OrderedHash<K, V>
where
    K: Eq + Hash + Clone + Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_after_initialization() {
        let hash: OrderedHash<String, i32> = OrderedHash::new();
        assert_eq!(hash.len(), 0);
        assert!(hash.is_empty());
        assert!(hash.keys().is_empty());
        assert!(hash.values().is_empty());
        assert!(hash.unsorted_dict().is_empty());
    }

    #[test]
    fn test_push_overwrites_in_place() {
        let mut hash = OrderedHash::new();
        hash.push("a", 1);
        hash.push("b", 2);
        hash.push("a", 3);

        assert_eq!(hash.len(), 2);
        assert_eq!(hash.keys(), &["a", "b"]);
        assert_eq!(hash.get(&"a"), Some(&3));
        assert_eq!(hash.at(0), Some(&3));
    }

    #[test]
    fn test_push_falsy_values_do_not_duplicate_keys() {
        let mut hash = OrderedHash::new();
        hash.push("zero", 0);
        hash.push("zero", 0);
        assert_eq!(hash.len(), 1);
    }

    #[test]
    fn test_insert_at_position() {
        let mut hash = OrderedHash::new();
        hash.push("a", 1);
        hash.push("c", 3);
        hash.insert(1, "b", 2);
        assert_eq!(hash.keys(), &["a", "b", "c"]);
        assert_eq!(hash.values(), vec![&1, &2, &3]);
    }

    #[test]
    fn test_insert_existing_key_is_noop() {
        let mut hash = OrderedHash::new();
        hash.push("a", 1);
        hash.push("b", 2);
        hash.insert(0, "b", 99);
        assert_eq!(hash.len(), 2);
        assert_eq!(hash.keys(), &["a", "b"]);
        assert_eq!(hash.get(&"b"), Some(&2));
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut hash = OrderedHash::new();
        hash.push("a", 1);
        hash.insert(10, "z", 26);
        assert_eq!(hash.keys(), &["a", "z"]);
    }

    #[test]
    fn test_positional_access_out_of_range() {
        let mut hash = OrderedHash::new();
        hash.push("a", 1);
        assert_eq!(hash.at(1), None);
        assert_eq!(hash.key(1), None);
        assert_eq!(hash.key(0), Some(&"a"));
        assert_eq!(hash.get(&"missing"), None);
    }

    #[test]
    fn test_map_preserves_order() {
        let hash: OrderedHash<&str, i32> = [("x", 1), ("y", 2), ("z", 3)].into_iter().collect();
        let rendered = hash.map(|k, v| format!("{k}={v}"));
        assert_eq!(rendered, vec!["x=1", "y=2", "z=3"]);
    }

    #[test]
    fn test_into_iter_in_order() {
        let mut hash = OrderedHash::new();
        hash.push(2, "two");
        hash.push(1, "one");
        hash.insert(0, 3, "three");
        let entries: Vec<_> = hash.into_iter().collect();
        assert_eq!(entries, vec![(3, "three"), (2, "two"), (1, "one")]);
    }

    #[test]
    fn test_serialize_keeps_order() {
        let mut hash = OrderedHash::new();
        hash.push("b".to_string(), 1);
        hash.push("a".to_string(), 2);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn test_get_or_insert_with_appends_once() {
        let mut hash: OrderedHash<&str, Vec<i32>> = OrderedHash::new();
        hash.get_or_insert_with("a", Vec::new).push(1);
        hash.get_or_insert_with("b", Vec::new).push(2);
        hash.get_or_insert_with("a", Vec::new).push(3);
        assert_eq!(hash.keys(), &["a", "b"]);
        assert_eq!(hash.get(&"a"), Some(&vec![1, 3]));
    }
}
