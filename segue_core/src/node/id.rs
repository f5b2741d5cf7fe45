// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity and kind.

use core::fmt;

/// Sentinel value indicating "no node" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a node in a [`NodeStore`](super::NodeStore).
///
/// The navigation tree is built once per session and never shrinks, so a
/// handle stays valid for the lifetime of the store that issued it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Rebuilds a handle from a raw slot index.
    ///
    /// Intended for decoding recorded diagnostics. Using the result with a
    /// store that never issued the index panics on access.
    #[inline]
    #[must_use]
    pub const fn from_index(idx: u32) -> Self {
        Self(idx)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Role of a node in the navigation tree, resolved once by the lineage builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A member of the logical tree: it has a parent and appears in that
    /// parent's children.
    Stable,
    /// A structural relay. It never appears in any children list but receives
    /// show/hide calls from the nodes beneath it and forwards them to its own
    /// ancestor passthrough.
    Passthrough,
}

/// Per-node cascade flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeConfig {
    /// Hide this node when it opens a further node.
    pub hide_on_further_open: bool,
    /// Hide sibling nodes when this node is shown.
    pub hide_siblings_on_open: bool,
    /// Show child nodes whenever this node is shown.
    pub always_show_children: bool,
    /// Leave dependent references inactive when this node is shown.
    pub deactivate_references_on_open: bool,
}

impl NodeConfig {
    /// All flags off.
    pub const PLAIN: Self = Self {
        hide_on_further_open: false,
        hide_siblings_on_open: false,
        always_show_children: false,
        deactivate_references_on_open: false,
    };

    /// A full-screen panel: replaces its siblings and steps aside for
    /// anything it opens.
    pub const SCREEN: Self = Self {
        hide_on_further_open: true,
        hide_siblings_on_open: true,
        always_show_children: false,
        deactivate_references_on_open: false,
    };

    /// A container whose children are always visible alongside it.
    pub const GROUP: Self = Self {
        hide_on_further_open: false,
        hide_siblings_on_open: false,
        always_show_children: true,
        deactivate_references_on_open: false,
    };
}
