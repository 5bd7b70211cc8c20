// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
struct Node {
    children: BTreeMap<char, Node>,
    terminal: bool,
}

impl Node {
    fn collect(&self, buffer: &mut String, into: &mut Vec<String>) {
        if self.terminal {
            into.push(buffer.clone());
        }

        for (&c, child) in &self.children {
            buffer.push(c);
            child.collect(buffer, into);
            buffer.pop();
        }
    }
}

/// PrefixIndex is a character trie over a set of strings, answering
/// "which strings start with this prefix" queries.
///
/// Every node explicitly records whether a string ends at it, so a string
/// which is a prefix of another inserted string is never lost.
#[derive(Debug, Default, Clone)]
pub struct PrefixIndex {
    root: Node,
    len: usize,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct strings in the index.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds a string to the index. Returns false if it was already present.
    pub fn insert(&mut self, s: &str) -> bool {
        let node = s
            .chars()
            .fold(&mut self.root, |node, c| node.children.entry(c).or_default());

        if node.terminal {
            false
        } else {
            node.terminal = true;
            self.len += 1;
            true
        }
    }

    /// Checks if exactly this string was inserted.
    pub fn contains(&self, s: &str) -> bool {
        self.find(s).is_some_and(|n| n.terminal)
    }

    /// Returns all inserted strings starting with `prefix`, in lexicographic order.
    ///
    /// An empty prefix returns every string in the index.
    pub fn search_prefix(&self, prefix: &str) -> Vec<String> {
        let mut found = Vec::default();
        if let Some(node) = self.find(prefix) {
            let mut buffer = prefix.to_string();
            node.collect(&mut buffer, &mut found);
        }
        found
    }

    fn find(&self, prefix: &str) -> Option<&Node> {
        prefix
            .chars()
            .try_fold(&self.root, |node, c| node.children.get(&c))
    }
}

impl<S: AsRef<str>> FromIterator<S> for PrefixIndex {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl<S: AsRef<str>> Extend<S> for PrefixIndex {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        for s in iter {
            self.insert(s.as_ref());
        }
    }
}
