// Copyright (c) 2025 Stockroom Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Prefix Index Implementation
//!
//! A case-insensitive trie mapping text keys to values, with prefix
//! retrieval of every value whose key starts with a given text. The catalog
//! uses it to map product names to product identifiers for autocomplete.

mod iter;
mod node;

use std::fmt;

pub use iter::PrefixMatches;
use node::TrieNode;

use super::normalize_key;

/// Case-insensitive prefix trie.
///
/// Key features:
/// * Keys are lowercased on insert and on lookup
/// * One value per normalized key; inserting an existing key replaces the value
/// * Prefix retrieval in a deterministic, lexicographic order
/// * No recursion on insert, lookup, traversal or drop
///
/// # Examples
///
/// ```
/// use stockroom_lib::data_structures::prefix_index::PrefixIndex;
///
/// let mut index = PrefixIndex::new();
/// index.insert("Rice 5kg", 1);
/// index.insert("Rice 10kg", 2);
/// index.insert("Sugar", 3);
///
/// let matches: Vec<_> = index.search_prefix("RIC").copied().collect();
/// assert_eq!(matches, vec![2, 1]);
/// ```
pub struct PrefixIndex<V> {
    /// The root node of the trie
    root: TrieNode<V>,

    /// Number of terminal nodes
    len: usize,
}

impl<V> PrefixIndex<V> {
    /// Creates a new empty `PrefixIndex`.
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            len: 0,
        }
    }

    /// Inserts a key-value pair, creating missing nodes along the key's path.
    ///
    /// # Returns
    ///
    /// The value previously stored under the same normalized key, if any.
    /// Two keys that differ only in case collide; the last insert wins.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let key = normalize_key(key);

        let mut node = &mut self.root;
        for c in key.chars() {
            node = node.children.entry(c).or_default();
        }

        let previous = node.value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Retrieves the value stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.find_node(&normalize_key(key))
            .and_then(|node| node.value.as_ref())
    }

    /// Checks if exactly `key` is indexed.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns every value whose key starts with `prefix`.
    ///
    /// An empty prefix matches everything. A prefix that leaves the trie at
    /// any character yields nothing.
    pub fn search_prefix(&self, prefix: &str) -> PrefixMatches<'_, V> {
        PrefixMatches::new(self.find_node(&normalize_key(prefix)))
    }

    /// Returns the number of keys in the index.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.root = TrieNode::new();
        self.len = 0;
    }

    /// Walks the already-normalized `key` from the root.
    fn find_node(&self, key: &str) -> Option<&TrieNode<V>> {
        let mut node = &self.root;
        for c in key.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}

impl<V> Default for PrefixIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for PrefixIndex<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixIndex")
            .field("len", &self.len)
            .field("root_children", &self.root.children.len())
            .field("root_terminal", &self.root.is_terminal())
            .finish()
    }
}
