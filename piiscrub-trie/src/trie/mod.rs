// piiscrub-trie/src/trie/mod.rs
//! Arena-backed name trie.
//!
//! Each node stands for one case-folded character. Children are stored as a
//! contiguous, label-sorted run of edges so that a lookup walks at most one
//! edge list per character of the query, independent of corpus size.

extern crate alloc;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::normalize::fold;

#[derive(Debug, Clone, Copy)]
struct Node {
    edges_start: u32,
    edges_len: u32,
    terminal: bool,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    label: char,
    target: u32,
}

#[derive(Debug, Default)]
struct BuildNode {
    children: BTreeMap<char, u32>,
    terminal: bool,
}

/// Mutable accumulator for names. Consumed by [`NameTrieBuilder::build`].
#[derive(Debug)]
pub struct NameTrieBuilder {
    nodes: Vec<BuildNode>,
    names: usize,
}

impl Default for NameTrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NameTrieBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![BuildNode::default()],
            names: 0,
        }
    }

    /// Inserts a name. Returns `true` if it was not already present.
    ///
    /// Names that are empty after trimming are ignored.
    pub fn insert(&mut self, name: &str) -> bool {
        let mut current = 0usize;
        let mut consumed = false;

        for label in fold(name) {
            consumed = true;
            let next_id = self.nodes.len() as u32;
            let child = *self.nodes[current].children.entry(label).or_insert(next_id);
            if child == next_id {
                self.nodes.push(BuildNode::default());
            }
            current = child as usize;
        }

        if !consumed {
            return false;
        }

        let node = &mut self.nodes[current];
        if node.terminal {
            false
        } else {
            node.terminal = true;
            self.names += 1;
            true
        }
    }

    /// Freezes the accumulated names into an immutable [`NameTrie`].
    pub fn build(self) -> NameTrie {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        let edge_total: usize = self.nodes.iter().map(|n| n.children.len()).sum();
        let mut edges = Vec::with_capacity(edge_total);

        for build_node in self.nodes {
            let edges_start = edges.len() as u32;
            // BTreeMap iteration is already label-sorted.
            edges.extend(
                build_node
                    .children
                    .into_iter()
                    .map(|(label, target)| Edge { label, target }),
            );
            nodes.push(Node {
                edges_start,
                edges_len: edges.len() as u32 - edges_start,
                terminal: build_node.terminal,
            });
        }

        NameTrie {
            nodes: nodes.into_boxed_slice(),
            edges: edges.into_boxed_slice(),
            len: self.names,
        }
    }
}

/// Read-only, case-insensitive name dictionary.
///
/// There is no way to insert or remove names once built.
#[derive(Clone)]
pub struct NameTrie {
    nodes: Box<[Node]>,
    edges: Box<[Edge]>,
    len: usize,
}

impl fmt::Debug for NameTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameTrie")
            .field("names", &self.len)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl Default for NameTrie {
    fn default() -> Self {
        NameTrieBuilder::new().build()
    }
}

impl NameTrie {
    /// Builds a trie from any collection of names. Duplicates (after case
    /// folding) collapse into a single entry.
    pub fn build<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = NameTrieBuilder::new();
        for name in names {
            builder.insert(name.as_ref());
        }
        builder.build()
    }

    /// Exact, case-insensitive membership test. Empty input is never a member.
    pub fn contains(&self, candidate: &str) -> bool {
        let mut current = 0usize;
        let mut consumed = false;

        for label in fold(candidate) {
            consumed = true;
            match self.child(current, label) {
                Some(next) => current = next,
                None => return false,
            }
        }

        consumed && self.nodes[current].terminal
    }

    fn child(&self, node: usize, label: char) -> Option<usize> {
        let node = &self.nodes[node];
        let start = node.edges_start as usize;
        let run = &self.edges[start..start + node.edges_len as usize];
        run.binary_search_by(|edge| edge.label.cmp(&label))
            .ok()
            .map(|i| run[i].target as usize)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<S: AsRef<str>> FromIterator<S> for NameTrie {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::build(iter)
    }
}
