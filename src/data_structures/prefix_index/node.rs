// Copyright (c) 2025 Stockroom Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Node implementation for the prefix index.
//!
//! Each node represents one character of a key path. A node is terminal
//! exactly when it holds a value, so a terminal node without a value cannot
//! be constructed.

use std::collections::BTreeMap;

/// A node in the prefix index.
pub(crate) struct TrieNode<V> {
    /// Children keyed by character, iterated in ascending order
    pub children: BTreeMap<char, TrieNode<V>>,

    /// Value stored at this node if a key ends here
    pub value: Option<V>,
}

impl<V> TrieNode<V> {
    /// Creates a new empty trie node.
    pub fn new() -> Self {
        Self {
            children: BTreeMap::new(),
            value: None,
        }
    }

    /// Whether a key ends at this node.
    pub fn is_terminal(&self) -> bool {
        self.value.is_some()
    }
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        Self::new()
    }
}

// Unlink children onto a heap stack so dropping a very long key path
// does not recurse once per character.
impl<V> Drop for TrieNode<V> {
    fn drop(&mut self) {
        let mut pending: Vec<TrieNode<V>> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}
