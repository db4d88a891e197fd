// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered, duplicate-free node set.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;

/// Ordered set of selected nodes.
///
/// Insertion order is preserved and duplicates are ignored, so a node matched
/// by several selectors (or by a selector and the predicate) appears once.
#[derive(Clone, Debug)]
pub struct EntitySet<K> {
    items: Vec<K>,
    index: HashSet<K>,
}

impl<K> Default for EntitySet<K> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashSet::new(),
        }
    }
}

impl<K> EntitySet<K> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of nodes in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns the nodes in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[K] {
        &self.items
    }

    /// Returns an iterator over the nodes in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, K> {
        self.items.iter()
    }
}

impl<K: Clone + Eq + Hash> EntitySet<K> {
    /// Inserts `key`, returning `false` if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        if !self.index.insert(key.clone()) {
            return false;
        }
        self.items.push(key);
        true
    }

    /// Returns `true` if the set contains `key`.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    /// Keeps only the nodes for which `keep` returns `true`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        let index = &mut self.index;
        self.items.retain(|key| {
            let kept = keep(key);
            if !kept {
                index.remove(key);
            }
            kept
        });
    }
}

impl<K: Clone + Eq + Hash> FromIterator<K> for EntitySet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl<K> IntoIterator for EntitySet<K> {
    type Item = K;
    type IntoIter = alloc::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a EntitySet<K> {
    type Item = &'a K;
    type IntoIter = core::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<K: PartialEq> PartialEq for EntitySet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<K: Eq> Eq for EntitySet<K> {}
