// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, NodeId};
use super::store::NodeStore;

/// An iterator over the logical children of a node, in discovery order.
///
/// Created by [`NodeStore::children`]. Passthrough nodes never appear.
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(NodeId(idx))
    }
}

impl NodeStore {
    /// Returns the logical siblings of a node (children of its parent other
    /// than the node itself).
    ///
    /// A node without a parent has no siblings.
    pub fn siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self
            .parent(id)
            .map_or(INVALID, |p| self.first_child[p.0 as usize]);
        Children::new(self, first).filter(move |&s| s != id)
    }

    /// Collects the subtree rooted at `id` in depth-first pre-order.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> alloc::vec::Vec<NodeId> {
        let mut out = alloc::vec::Vec::new();
        self.collect_subtree(id, &mut out);
        out
    }

    fn collect_subtree(&self, id: NodeId, out: &mut alloc::vec::Vec<NodeId>) {
        out.push(id);
        for child in self.children(id) {
            self.collect_subtree(child, out);
        }
    }
}
