// Copyright (c) 2025 Stockroom Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Subtree traversal for prefix searches.

use super::node::TrieNode;

/// Iterator over every value stored under a prefix.
///
/// Values come out in pre-order with children visited in ascending
/// character order, which is the lexicographic order of the normalized
/// keys. The order depends only on the set of keys in the index, not on the
/// order they were inserted in.
pub struct PrefixMatches<'a, V> {
    /// Nodes still to visit; the next node is at the top
    stack: Vec<&'a TrieNode<V>>,
}

impl<'a, V> PrefixMatches<'a, V> {
    pub(super) fn new(start: Option<&'a TrieNode<V>>) -> Self {
        Self {
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a, V> Iterator for PrefixMatches<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            // Reversed so the smallest child is popped first
            self.stack.extend(node.children.values().rev());
            if let Some(value) = &node.value {
                return Some(value);
            }
        }
        None
    }
}

impl<V> std::iter::FusedIterator for PrefixMatches<'_, V> {}
