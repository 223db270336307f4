//! Dense entity-keyed maps.
//!
//! [`PrimaryMap`] owns the data for every entity it hands out.
//! [`SecondaryMap`] attaches optional side data to entities owned elsewhere.

use alloc::vec::Vec;
use core::{
    marker::PhantomData,
    ops::{Index, IndexMut},
};

use crate::entity::EntityRef;

/// Dense map from entity to data
///
/// This is essentially a Vec with entity-based indexing.
#[derive(Debug, Clone)]
pub struct PrimaryMap<K: EntityRef, V> {
    data: Vec<V>,
    _phantom: PhantomData<K>,
}

impl<K: EntityRef, V> PrimaryMap<K, V> {
    /// Create a new empty PrimaryMap
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Push a value and return its entity key
    ///
    /// The entity key will have an index equal to the current length
    /// of the map before the push.
    pub fn push(&mut self, value: V) -> K {
        let index = self.data.len();
        self.data.push(value);
        K::from_index(index)
    }

    /// Get a value by entity key
    pub fn get(&self, key: K) -> Option<&V> {
        self.data.get(key.index())
    }

    /// Get a mutable value by entity key
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.data.get_mut(key.index())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over entries as (entity, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (K::from_index(i), v))
    }

    /// Iterate over values
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.data.iter()
    }
}

impl<K: EntityRef, V> Default for PrimaryMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityRef, V> Index<K> for PrimaryMap<K, V> {
    type Output = V;

    fn index(&self, key: K) -> &V {
        &self.data[key.index()]
    }
}

impl<K: EntityRef, V> IndexMut<K> for PrimaryMap<K, V> {
    fn index_mut(&mut self, key: K) -> &mut V {
        &mut self.data[key.index()]
    }
}

/// Sparse side table keyed by entities from some [`PrimaryMap`].
///
/// Storage grows on demand up to the largest key inserted. Keys that were
/// never inserted read as `None`.
#[derive(Debug, Clone)]
pub struct SecondaryMap<K: EntityRef, V> {
    data: Vec<Option<V>>,
    _phantom: PhantomData<K>,
}

impl<K: EntityRef, V> SecondaryMap<K, V> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Create a map with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            _phantom: PhantomData,
        }
    }

    /// Set the value for `key`, returning the previous one
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = key.index();
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
        self.data[index].replace(value)
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.data.get(key.index()).and_then(Option::as_ref)
    }

    pub fn contains_key(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Number of keys that hold a value
    pub fn len(&self) -> usize {
        self.data.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the keys that hold a value
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (K::from_index(i), v)))
    }
}

impl<K: EntityRef, V> Default for SecondaryMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::entity::{NodeId, TokenId};

    #[test]
    fn test_primary_map_basic() {
        let mut map: PrimaryMap<NodeId, i32> = PrimaryMap::new();

        let n1 = map.push(10);
        let n2 = map.push(20);
        let n3 = map.push(30);

        assert_eq!(map.get(n1), Some(&10));
        assert_eq!(map.get(n2), Some(&20));
        assert_eq!(map[n3], 30);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_primary_map_index_mut() {
        let mut map: PrimaryMap<NodeId, i32> = PrimaryMap::new();
        let n = map.push(1);
        map[n] += 41;
        assert_eq!(map[n], 42);
    }

    #[test]
    fn test_primary_map_iteration() {
        let mut map: PrimaryMap<TokenId, &str> = PrimaryMap::new();
        map.push("a");
        map.push("b");

        let items: Vec<_> = map.iter().collect();
        assert_eq!(items, [(TokenId::from_index(0), &"a"), (TokenId::from_index(1), &"b")]);
    }

    #[test]
    fn test_secondary_map_missing_keys() {
        let mut map: SecondaryMap<NodeId, bool> = SecondaryMap::new();
        map.insert(NodeId::from_index(5), true);

        assert_eq!(map.get(NodeId::from_index(5)), Some(&true));
        assert_eq!(map.get(NodeId::from_index(2)), None);
        assert_eq!(map.get(NodeId::from_index(99)), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_secondary_map_overwrite() {
        let mut map: SecondaryMap<NodeId, bool> = SecondaryMap::with_capacity(4);
        let key = NodeId::from_index(0);

        assert_eq!(map.insert(key, false), None);
        assert_eq!(map.insert(key, true), Some(false));
        assert!(map.contains_key(key));
        assert_eq!(map.iter().count(), 1);
    }
}
