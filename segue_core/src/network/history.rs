// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation history and the untracked set.

use alloc::vec::Vec;

use crate::node::NodeId;

/// Visited nodes, bottom (root) first, plus nodes shown outside the stack.
#[derive(Clone, Debug, Default)]
pub(crate) struct History {
    entries: Vec<NodeId>,
    untracked: Vec<NodeId>,
}

impl History {
    pub(crate) fn entries(&self) -> &[NodeId] {
        &self.entries
    }

    pub(crate) fn untracked(&self) -> &[NodeId] {
        &self.untracked
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Bottom-based index of `node`.
    pub(crate) fn position(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().position(|&n| n == node)
    }

    pub(crate) fn contains(&self, node: NodeId) -> bool {
        self.entries.contains(&node)
    }

    pub(crate) fn push(&mut self, node: NodeId) {
        self.entries.push(node);
    }

    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        self.entries.pop()
    }

    pub(crate) fn top(&self) -> Option<NodeId> {
        self.entries.last().copied()
    }

    /// The entry directly below the top.
    pub(crate) fn below_top(&self) -> Option<NodeId> {
        let len = self.entries.len();
        if len <= 1 {
            return None;
        }
        Some(self.entries[len - 2])
    }

    /// Adds `node` to the untracked set. Returns `false` if already present.
    pub(crate) fn track_untracked(&mut self, node: NodeId) -> bool {
        if self.untracked.contains(&node) {
            return false;
        }
        self.untracked.push(node);
        true
    }

    /// Removes `node` from the untracked set. Returns `false` if absent.
    pub(crate) fn forget_untracked(&mut self, node: NodeId) -> bool {
        let before = self.untracked.len();
        self.untracked.retain(|&n| n != node);
        self.untracked.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_top_needs_two_entries() {
        let mut h = History::default();
        assert_eq!(h.below_top(), None);
        h.push(NodeId::from_index(0));
        assert_eq!(h.below_top(), None);
        h.push(NodeId::from_index(3));
        assert_eq!(h.below_top(), Some(NodeId::from_index(0)));
        assert_eq!(h.top(), Some(NodeId::from_index(3)));
        assert_eq!(h.position(NodeId::from_index(3)), Some(1));
    }

    #[test]
    fn untracked_set_has_no_duplicates() {
        let mut h = History::default();
        let n = NodeId::from_index(2);
        assert!(h.track_untracked(n));
        assert!(!h.track_untracked(n));
        assert_eq!(h.untracked(), &[n]);
        assert!(h.forget_untracked(n));
        assert!(!h.forget_untracked(n));
        assert!(h.entries().is_empty());
    }
}
