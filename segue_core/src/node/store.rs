// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with topology, visual state, and transitions.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Point;
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, NodeConfig, NodeId, NodeKind};
use super::traverse::Children;
use crate::dirty;
use crate::reference::{DependentReference, ReferenceSet};
use crate::transition::{Direction, TransitionMeta};

/// Struct-of-arrays storage for every node of one navigation tree.
///
/// Nodes are addressed by [`NodeId`] handles. Topology is kept as
/// parent / first-child / next-sibling links so that children iterate in
/// insertion (discovery) order. Passthrough nodes record a parent but are
/// never linked into a children list.
#[derive(Debug)]
pub struct NodeStore {
    // -- Identity --
    pub(crate) kind: Vec<NodeKind>,
    pub(crate) name: Vec<String>,
    pub(crate) config: Vec<NodeConfig>,

    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) ancestor_passthrough: Vec<u32>,
    pub(crate) visual_parent: Vec<u32>,

    // -- Local state (written by the cascade and the transition runner) --
    pub(crate) shown: Vec<bool>,
    pub(crate) opacity: Vec<f32>,
    pub(crate) position: Vec<Point>,
    pub(crate) interactable: Vec<bool>,
    pub(crate) blocks_raycasts: Vec<bool>,
    pub(crate) ignore_parent: Vec<bool>,
    pub(crate) show_transition: Vec<TransitionMeta>,
    pub(crate) hide_transition: Vec<TransitionMeta>,
    pub(crate) references: Vec<ReferenceSet>,

    // -- Computed state (written by evaluate) --
    pub(crate) effective_opacity: Vec<f32>,
    pub(crate) effective_interactable: Vec<bool>,

    pub(crate) len: u32,
    pub(crate) dirty: DirtyTracker<u32>,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kind: Vec::new(),
            name: Vec::new(),
            config: Vec::new(),
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            ancestor_passthrough: Vec::new(),
            visual_parent: Vec::new(),
            shown: Vec::new(),
            opacity: Vec::new(),
            position: Vec::new(),
            interactable: Vec::new(),
            blocks_raycasts: Vec::new(),
            ignore_parent: Vec::new(),
            show_transition: Vec::new(),
            hide_transition: Vec::new(),
            references: Vec::new(),
            effective_opacity: Vec::new(),
            effective_interactable: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    // -- Allocation API --

    /// Creates a detached node and returns its handle.
    ///
    /// The node starts hidden (`shown == false`) but fully opaque and
    /// interactable, at the origin, with no transitions.
    pub fn create_node(
        &mut self,
        kind: NodeKind,
        name: impl Into<String>,
        config: NodeConfig,
    ) -> NodeId {
        let idx = self.len;
        self.len += 1;
        self.kind.push(kind);
        self.name.push(name.into());
        self.config.push(config);
        self.parent.push(INVALID);
        self.first_child.push(INVALID);
        self.next_sibling.push(INVALID);
        self.ancestor_passthrough.push(INVALID);
        self.visual_parent.push(INVALID);
        self.shown.push(false);
        self.opacity.push(1.0);
        self.position.push(Point::ZERO);
        self.interactable.push(true);
        self.blocks_raycasts.push(true);
        self.ignore_parent.push(false);
        self.show_transition.push(TransitionMeta::none());
        self.hide_transition.push(TransitionMeta::none());
        self.references.push(ReferenceSet::default());
        self.effective_opacity.push(1.0);
        self.effective_interactable.push(true);

        self.dirty.mark(idx, dirty::OPACITY);
        self.dirty.mark(idx, dirty::INTERACTION);
        self.dirty.mark(idx, dirty::POSITION);
        self.dirty.mark(idx, dirty::VISIBILITY);

        NodeId(idx)
    }

    /// Number of nodes in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the store holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over every node handle in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.len).map(NodeId)
    }

    /// Finds the first node with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.name
            .iter()
            .position(|n| n == name)
            .and_then(|idx| u32::try_from(idx).ok())
            .map(NodeId)
    }

    // -- Topology API --

    /// Places `id` under the logical parent `parent`, optionally behind the
    /// passthrough `passthrough`.
    ///
    /// Stable nodes are appended to `parent`'s children. Passthrough nodes
    /// only record the parent link. The node's visual parent becomes
    /// `passthrough` if given, else `parent`.
    ///
    /// # Panics
    ///
    /// Panics if a handle is unknown, if `id` is already attached, or if
    /// `passthrough` is not a passthrough node.
    pub fn attach(&mut self, id: NodeId, parent: NodeId, passthrough: Option<NodeId>) {
        self.validate(id);
        self.validate(parent);
        let c = id.0;
        let p = parent.0;
        assert!(self.parent[c as usize] == INVALID, "node already attached");
        assert!(
            self.kind[p as usize] == NodeKind::Stable,
            "logical parent must be a stable node"
        );

        self.parent[c as usize] = p;
        if self.kind[c as usize] == NodeKind::Stable {
            if self.first_child[p as usize] == INVALID {
                self.first_child[p as usize] = c;
            } else {
                // Walk to last child.
                let mut last = self.first_child[p as usize];
                while self.next_sibling[last as usize] != INVALID {
                    last = self.next_sibling[last as usize];
                }
                self.next_sibling[last as usize] = c;
            }
        }

        let visual = match passthrough {
            Some(pt) => {
                self.validate(pt);
                assert!(
                    self.kind[pt.0 as usize] == NodeKind::Passthrough,
                    "ancestor passthrough must be a passthrough node"
                );
                self.ancestor_passthrough[c as usize] = pt.0;
                pt.0
            }
            None => p,
        };
        self.visual_parent[c as usize] = visual;

        // Child depends on its visual parent for inherited channels.
        let _ = self.dirty.add_dependency(c, visual, dirty::OPACITY);
        let _ = self.dirty.add_dependency(c, visual, dirty::INTERACTION);
        self.dirty.mark_with(c, dirty::OPACITY, &EagerPolicy);
        self.dirty.mark_with(c, dirty::INTERACTION, &EagerPolicy);
    }

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.validate(id);
        self.kind[id.0 as usize]
    }

    /// Returns the name a node was created with.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        self.validate(id);
        &self.name[id.0 as usize]
    }

    /// Iterates over node names in creation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.name.iter().map(String::as_str)
    }

    /// Returns the cascade flags of a node.
    #[must_use]
    pub fn config(&self, id: NodeId) -> NodeConfig {
        self.validate(id);
        self.config[id.0 as usize]
    }

    /// Replaces the cascade flags of a node.
    pub fn set_config(&mut self, id: NodeId, config: NodeConfig) {
        self.validate(id);
        self.config[id.0 as usize] = config;
    }

    /// Returns the logical parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        link(self.parent[id.0 as usize])
    }

    /// Returns an iterator over the logical children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.0 as usize])
    }

    /// Returns the nearest passthrough between a node and its logical parent.
    #[must_use]
    pub fn ancestor_passthrough(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        link(self.ancestor_passthrough[id.0 as usize])
    }

    /// Returns the nearest enclosing node of either kind.
    #[must_use]
    pub fn visual_parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        link(self.visual_parent[id.0 as usize])
    }

    /// Reflexive descendant test: `true` if `other` is `id` or lies anywhere
    /// in its logical subtree.
    #[must_use]
    pub fn is_parent_of(&self, id: NodeId, other: NodeId) -> bool {
        self.validate(other);
        if id == other {
            return true;
        }
        self.children(id).any(|child| self.is_parent_of(child, other))
    }

    // -- Visual state getters --

    /// Whether the node is currently shown.
    #[must_use]
    pub fn is_shown(&self, id: NodeId) -> bool {
        self.validate(id);
        self.shown[id.0 as usize]
    }

    /// Returns the local opacity of a node.
    #[must_use]
    pub fn opacity(&self, id: NodeId) -> f32 {
        self.validate(id);
        self.opacity[id.0 as usize]
    }

    /// Returns the anchored position of a node.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Point {
        self.validate(id);
        self.position[id.0 as usize]
    }

    /// Whether the node accepts interaction.
    #[must_use]
    pub fn is_interactable(&self, id: NodeId) -> bool {
        self.validate(id);
        self.interactable[id.0 as usize]
    }

    /// Whether the node blocks raycasts (accepts pointer input).
    #[must_use]
    pub fn blocks_raycasts(&self, id: NodeId) -> bool {
        self.validate(id);
        self.blocks_raycasts[id.0 as usize]
    }

    /// Whether the node ignores state inherited from its visual parent.
    #[must_use]
    pub fn ignores_parent(&self, id: NodeId) -> bool {
        self.validate(id);
        self.ignore_parent[id.0 as usize]
    }

    /// Returns the transition used when the node moves in `direction`.
    #[must_use]
    pub fn transition(&self, id: NodeId, direction: Direction) -> TransitionMeta {
        self.validate(id);
        match direction {
            Direction::Show => self.show_transition[id.0 as usize],
            Direction::Hide => self.hide_transition[id.0 as usize],
        }
    }

    /// Returns the computed effective opacity of a node.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn effective_opacity(&self, id: NodeId) -> f32 {
        self.validate(id);
        self.effective_opacity[id.0 as usize]
    }

    /// Whether the node and all its visual ancestors are interactable and
    /// block raycasts.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn effective_interactable(&self, id: NodeId) -> bool {
        self.validate(id);
        self.effective_interactable[id.0 as usize]
    }

    /// Number of live dependent references registered on a node.
    #[must_use]
    pub fn reference_count(&self, id: NodeId) -> usize {
        self.validate(id);
        self.references[id.0 as usize].live_count()
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the local opacity of a node.
    pub fn set_opacity(&mut self, id: NodeId, opacity: f32) {
        self.validate(id);
        self.opacity[id.0 as usize] = opacity;
        self.dirty.mark_with(id.0, dirty::OPACITY, &EagerPolicy);
    }

    /// Sets the anchored position of a node.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        self.validate(id);
        self.position[id.0 as usize] = position;
        self.dirty.mark(id.0, dirty::POSITION);
    }

    /// Sets whether the node accepts interaction.
    pub fn set_interactable(&mut self, id: NodeId, interactable: bool) {
        self.validate(id);
        self.interactable[id.0 as usize] = interactable;
        self.dirty.mark_with(id.0, dirty::INTERACTION, &EagerPolicy);
    }

    /// Sets whether the node blocks raycasts.
    pub fn set_blocks_raycasts(&mut self, id: NodeId, blocks: bool) {
        self.validate(id);
        self.blocks_raycasts[id.0 as usize] = blocks;
        self.dirty.mark_with(id.0, dirty::INTERACTION, &EagerPolicy);
    }

    /// Sets interactivity on a node and every logical descendant.
    pub fn set_lineage_interactable(&mut self, id: NodeId, interactable: bool) {
        self.set_interactable(id, interactable);
        let mut child = self.first_child[id.0 as usize];
        while child != INVALID {
            self.set_lineage_interactable(NodeId(child), interactable);
            child = self.next_sibling[child as usize];
        }
    }

    /// Sets whether the node ignores the opacity and interactivity it would
    /// inherit from its visual parent.
    pub fn set_ignore_parent(&mut self, id: NodeId, ignore: bool) {
        self.validate(id);
        self.ignore_parent[id.0 as usize] = ignore;
        self.dirty.mark_with(id.0, dirty::OPACITY, &EagerPolicy);
        self.dirty.mark_with(id.0, dirty::INTERACTION, &EagerPolicy);
    }

    /// Sets `ignore_parent` on a node and every logical descendant.
    pub fn set_lineage_ignore_parent(&mut self, id: NodeId, ignore: bool) {
        self.set_ignore_parent(id, ignore);
        let mut child = self.first_child[id.0 as usize];
        while child != INVALID {
            self.set_lineage_ignore_parent(NodeId(child), ignore);
            child = self.next_sibling[child as usize];
        }
    }

    pub(crate) fn set_shown(&mut self, id: NodeId, shown: bool) {
        self.validate(id);
        if self.shown[id.0 as usize] != shown {
            self.shown[id.0 as usize] = shown;
            self.dirty.mark(id.0, dirty::VISIBILITY);
        }
    }

    pub(crate) fn set_transition(
        &mut self,
        id: NodeId,
        direction: Direction,
        meta: TransitionMeta,
    ) {
        self.validate(id);
        match direction {
            Direction::Show => self.show_transition[id.0 as usize] = meta,
            Direction::Hide => self.hide_transition[id.0 as usize] = meta,
        }
    }

    pub(crate) fn register_reference(
        &mut self,
        id: NodeId,
        reference: &Rc<RefCell<dyn DependentReference>>,
    ) -> bool {
        self.validate(id);
        self.references[id.0 as usize].insert(reference)
    }

    pub(crate) fn set_reference_status(&mut self, id: NodeId, flag: bool) {
        self.validate(id);
        self.references[id.0 as usize].broadcast(flag);
    }

    // -- Raw-index accessors for presenters --
    //
    // These accept raw slot indices as found in `VisualChanges`.

    /// Returns the local opacity at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[must_use]
    pub fn opacity_at(&self, idx: u32) -> f32 {
        self.validate(NodeId(idx));
        self.opacity[idx as usize]
    }

    /// Returns the anchored position at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[must_use]
    pub fn position_at(&self, idx: u32) -> Point {
        self.validate(NodeId(idx));
        self.position[idx as usize]
    }

    /// Returns whether the node at raw slot `idx` is interactable.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[must_use]
    pub fn interactable_at(&self, idx: u32) -> bool {
        self.validate(NodeId(idx));
        self.interactable[idx as usize]
    }

    /// Returns whether the node at raw slot `idx` blocks raycasts.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[must_use]
    pub fn blocks_raycasts_at(&self, idx: u32) -> bool {
        self.validate(NodeId(idx));
        self.blocks_raycasts[idx as usize]
    }

    /// Returns the effective opacity at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[must_use]
    pub fn effective_opacity_at(&self, idx: u32) -> f32 {
        self.validate(NodeId(idx));
        self.effective_opacity[idx as usize]
    }

    /// Returns the effective interactivity at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[must_use]
    pub fn effective_interactable_at(&self, idx: u32) -> bool {
        self.validate(NodeId(idx));
        self.effective_interactable[idx as usize]
    }

    /// Returns the `shown` flag at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[must_use]
    pub fn shown_at(&self, idx: u32) -> bool {
        self.validate(NodeId(idx));
        self.shown[idx as usize]
    }

    // -- Internal helpers --

    /// Panics if the handle was not issued by this store.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.0 < self.len,
            "unknown NodeId: {id:?} (store holds {} nodes)",
            self.len
        );
    }
}

fn link(idx: u32) -> Option<NodeId> {
    if idx == INVALID { None } else { Some(NodeId(idx)) }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn stable(store: &mut NodeStore, name: &str) -> NodeId {
        store.create_node(NodeKind::Stable, name, NodeConfig::PLAIN)
    }

    #[test]
    fn create_starts_hidden_but_opaque() {
        let mut store = NodeStore::new();
        let id = stable(&mut store, "menu");
        assert!(!store.is_shown(id));
        assert!((store.opacity(id) - 1.0).abs() < 1e-6, "opaque");
        assert!(store.is_interactable(id));
        assert_eq!(store.position(id), Point::ZERO);
        assert!(!store.transition(id, Direction::Show).is_animated());
        assert_eq!(store.name(id), "menu");
    }

    #[test]
    fn attach_appends_in_order() {
        let mut store = NodeStore::new();
        let root = stable(&mut store, "root");
        let a = stable(&mut store, "a");
        let b = stable(&mut store, "b");
        store.attach(a, root, None);
        store.attach(b, root, None);

        assert_eq!(store.parent(a), Some(root));
        let kids: Vec<_> = store.children(root).collect();
        assert_eq!(kids, vec![a, b]);
    }

    #[test]
    fn passthrough_is_not_a_child() {
        let mut store = NodeStore::new();
        let root = stable(&mut store, "root");
        let pt = store.create_node(NodeKind::Passthrough, "relay", NodeConfig::PLAIN);
        let x = stable(&mut store, "x");
        store.attach(pt, root, None);
        store.attach(x, root, Some(pt));

        let kids: Vec<_> = store.children(root).collect();
        assert_eq!(kids, vec![x]);
        assert_eq!(store.parent(pt), Some(root));
        assert_eq!(store.ancestor_passthrough(x), Some(pt));
        assert_eq!(store.visual_parent(x), Some(pt));
        assert_eq!(store.visual_parent(pt), Some(root));
    }

    #[test]
    fn is_parent_of_is_reflexive_and_recursive() {
        let mut store = NodeStore::new();
        let root = stable(&mut store, "root");
        let a = stable(&mut store, "a");
        let b = stable(&mut store, "b");
        let c = stable(&mut store, "c");
        store.attach(a, root, None);
        store.attach(b, a, None);
        store.attach(c, root, None);

        assert!(store.is_parent_of(a, a));
        assert!(store.is_parent_of(root, b));
        assert!(store.is_parent_of(a, b));
        assert!(!store.is_parent_of(a, c));
        assert!(!store.is_parent_of(b, a));
    }

    #[test]
    fn lineage_interactivity_reaches_descendants() {
        let mut store = NodeStore::new();
        let root = stable(&mut store, "root");
        let a = stable(&mut store, "a");
        let b = stable(&mut store, "b");
        store.attach(a, root, None);
        store.attach(b, a, None);

        store.set_lineage_interactable(a, false);
        assert!(store.is_interactable(root));
        assert!(!store.is_interactable(a));
        assert!(!store.is_interactable(b));
    }

    #[test]
    fn subtree_is_pre_order_without_passthroughs() {
        let mut store = NodeStore::new();
        let root = stable(&mut store, "root");
        let a = stable(&mut store, "a");
        let pt = store.create_node(NodeKind::Passthrough, "relay", NodeConfig::PLAIN);
        let a1 = stable(&mut store, "a1");
        let b = stable(&mut store, "b");
        store.attach(a, root, None);
        store.attach(pt, a, None);
        store.attach(a1, a, Some(pt));
        store.attach(b, root, None);

        assert_eq!(store.subtree(root), vec![root, a, a1, b]);
        assert_eq!(store.subtree(a1), vec![a1]);
    }

    #[test]
    fn set_config_replaces_flags() {
        let mut store = NodeStore::new();
        let id = stable(&mut store, "menu");
        store.set_config(id, NodeConfig::GROUP);
        assert!(store.config(id).always_show_children);
        assert_eq!(store.reference_count(id), 0);
    }

    #[test]
    fn lineage_ignore_parent_reaches_descendants() {
        let mut store = NodeStore::new();
        let root = stable(&mut store, "root");
        let a = stable(&mut store, "a");
        let b = stable(&mut store, "b");
        store.attach(a, root, None);
        store.attach(b, a, None);

        store.set_lineage_ignore_parent(a, true);
        assert!(!store.ignores_parent(root));
        assert!(store.ignores_parent(a));
        assert!(store.ignores_parent(b));
    }

    #[test]
    fn find_by_name() {
        let mut store = NodeStore::new();
        let _root = stable(&mut store, "root");
        let settings = stable(&mut store, "settings");
        assert_eq!(store.find("settings"), Some(settings));
        assert_eq!(store.find("missing"), None);
    }

    #[test]
    #[should_panic(expected = "node already attached")]
    fn double_attach_panics() {
        let mut store = NodeStore::new();
        let root = stable(&mut store, "root");
        let a = stable(&mut store, "a");
        store.attach(a, root, None);
        store.attach(a, root, None);
    }

    #[test]
    #[should_panic(expected = "unknown NodeId")]
    fn unknown_handle_panics() {
        let store = NodeStore::new();
        let _ = store.opacity(NodeId(4));
    }
}
