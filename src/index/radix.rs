//! Radix Trie Index
//!
//! Maps normalized terms to sets of record IDs, searchable by prefix. Edges
//! are labeled with strings (not single characters), so common prefixes are
//! stored once and node count stays proportional to the number of distinct
//! branch points rather than total characters.
//!
//! The trie is laid out as an arena: all nodes live in one `Vec` and refer
//! to their children by `u32` index. That keeps the structure cache-friendly
//! and makes the memory accounting a flat walk over the arena.
//!
//! ## Invariants
//! - At any node, no two children share a first character.
//! - Edge labels are non-empty except at the root.
//! - Sibling lists are sorted by edge label; ID lists are sorted and
//!   duplicate-free. Traversal order is therefore deterministic for a given
//!   (term, id) multiset, regardless of insertion order.

use std::collections::HashSet;
use std::mem;

const ROOT: usize = 0;

#[derive(Debug, Default)]
struct RadixNode {
    edge_label: String,
    /// Record IDs of terms terminating at this node. Sorted, unique.
    ids: Vec<u64>,
    /// Arena indices of child nodes, sorted by their edge labels.
    children: Vec<u32>,
}

#[derive(Debug)]
pub struct RadixTrieIndex {
    nodes: Vec<RadixNode>,
    term_count: usize,
}

impl Default for RadixTrieIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl RadixTrieIndex {
    pub fn new() -> Self {
        Self {
            nodes: vec![RadixNode::default()],
            term_count: 0,
        }
    }

    /// Number of `insert` calls made against this trie, duplicates included.
    pub fn term_count(&self) -> usize {
        self.term_count
    }

    /// Associates `id` with `term`. Inserting an empty term is a no-op.
    pub fn insert(&mut self, term: &str, id: u64) {
        if term.is_empty() {
            return;
        }
        self.term_count += 1;

        let mut node = ROOT;
        let mut remaining = term;

        loop {
            // Children have distinct first characters, so at most one child
            // can share a prefix with the remaining term.
            let shared = self.nodes[node]
                .children
                .iter()
                .map(|&c| c as usize)
                .find_map(|child| {
                    let common = common_prefix_len(&self.nodes[child].edge_label, remaining);
                    (common > 0).then_some((child, common))
                });

            let Some((child, common)) = shared else {
                // No sharing child: attach the rest of the term as a leaf.
                let leaf = self.alloc(remaining, vec![id]);
                self.attach_child(node, leaf);
                return;
            };

            let label_len = self.nodes[child].edge_label.len();

            if common == label_len && common == remaining.len() {
                // Exact edge match: the term ends at this child.
                push_sorted_unique(&mut self.nodes[child].ids, id);
                return;
            }

            if common == label_len {
                // The whole edge matches; continue with the suffix.
                remaining = &remaining[common..];
                node = child;
                continue;
            }

            // The edge label only partially matches: split it. The old child
            // keeps the label suffix and is reparented under a new
            // intermediate node carrying the common prefix.
            let common_prefix = self.nodes[child].edge_label[..common].to_string();
            let old_suffix = self.nodes[child].edge_label[common..].to_string();
            self.nodes[child].edge_label = old_suffix;

            let intermediate = self.alloc(&common_prefix, Vec::new());
            self.nodes[intermediate].children.push(child as u32);
            self.replace_child(node, child, intermediate);

            if common == remaining.len() {
                // The term ends exactly at the split point.
                push_sorted_unique(&mut self.nodes[intermediate].ids, id);
            } else {
                let leaf = self.alloc(&remaining[common..], vec![id]);
                self.attach_child(intermediate, leaf);
            }
            return;
        }
    }

    /// Returns every ID stored in the subtree matched by `prefix`, in a
    /// stable order (DFS over sorted siblings, first occurrence wins).
    /// An empty prefix matches nothing.
    pub fn search(&self, prefix: &str) -> Vec<u64> {
        if prefix.is_empty() {
            return Vec::new();
        }

        let mut node = ROOT;
        let mut remaining = prefix;

        loop {
            let mut descended = false;

            for &child in &self.nodes[node].children {
                let child = child as usize;
                let label = &self.nodes[child].edge_label;

                if remaining.len() <= label.len() {
                    if label.as_bytes().starts_with(remaining.as_bytes()) {
                        // The prefix is exhausted inside this edge: the whole
                        // subtree below it matches.
                        return self.collect_subtree(child);
                    }
                } else if remaining.as_bytes().starts_with(label.as_bytes()) {
                    remaining = &remaining[label.len()..];
                    node = child;
                    descended = true;
                    break;
                }
            }

            if !descended {
                return Vec::new();
            }
        }
    }

    /// Summed in-memory footprint of the trie: per node, the fixed node
    /// size plus edge-label capacity, ID-list capacity and child-slot
    /// capacity.
    pub fn memory_usage(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| {
                mem::size_of::<RadixNode>()
                    + node.edge_label.capacity()
                    + node.ids.capacity() * mem::size_of::<u64>()
                    + node.children.capacity() * mem::size_of::<u32>()
            })
            .sum()
    }

    fn alloc(&mut self, edge_label: &str, ids: Vec<u64>) -> usize {
        self.nodes.push(RadixNode {
            edge_label: edge_label.to_string(),
            ids,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Inserts `child` into `parent`'s child list, keeping siblings sorted
    /// by edge label.
    fn attach_child(&mut self, parent: usize, child: usize) {
        let label = &self.nodes[child].edge_label;
        let pos = self.nodes[parent]
            .children
            .iter()
            .position(|&c| self.nodes[c as usize].edge_label.as_str() > label.as_str())
            .unwrap_or(self.nodes[parent].children.len());
        self.nodes[parent].children.insert(pos, child as u32);
    }

    /// Swaps `old` for `new` in `parent`'s child list. The new node carries
    /// a prefix of the old edge label, so the sort position is unchanged.
    fn replace_child(&mut self, parent: usize, old: usize, new: usize) {
        if let Some(slot) = self.nodes[parent]
            .children
            .iter_mut()
            .find(|slot| **slot == old as u32)
        {
            *slot = new as u32;
        }
    }

    fn collect_subtree(&self, start: usize) -> Vec<u64> {
        let mut results = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            for &id in &self.nodes[node].ids {
                if seen.insert(id) {
                    results.push(id);
                }
            }
            // Reverse so the sorted-first child is popped first.
            for &child in self.nodes[node].children.iter().rev() {
                stack.push(child as usize);
            }
        }

        results
    }
}

/// Length in bytes of the longest common prefix of `a` and `b`, measured on
/// whole characters so the result is always a valid slice boundary.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .take_while(|((_, ca), cb)| ca == cb)
        .map(|((i, ca), _)| i + ca.len_utf8())
        .last()
        .unwrap_or(0)
}

fn push_sorted_unique(ids: &mut Vec<u64>, id: u64) {
    if let Err(pos) = ids.binary_search(&id) {
        ids.insert(pos, id);
    }
}
