// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lineage builder: resolves a raw containment hierarchy into the logical
//! node tree.
//!
//! The host toolkit exposes its widget containment through [`Hierarchy`].
//! Each container may declare a node role, a passthrough role, both, or
//! neither:
//!
//! - A container with a node role becomes a [`NodeKind::Stable`] node. Its
//!   logical parent is the nearest enclosing stable node, and its ancestor
//!   passthrough is the nearest enclosing passthrough below that parent.
//! - A container with only a passthrough role becomes a
//!   [`NodeKind::Passthrough`] node. It never enters a children list.
//! - A container declaring both roles resolves to a stable node; the
//!   passthrough role is dropped.
//! - Containers with neither role are skipped transparently.
//!
//! The hierarchy root always becomes the root node.
//!
//! [`SceneTree`] is an in-memory [`Hierarchy`] for hosts without their own
//! containment model, and for tests.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::node::{NodeConfig, NodeId, NodeKind, NodeStore};
use crate::trace::{LineageEvent, Tracer};

/// Roles a container declares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContainerRole {
    /// Node role and its cascade flags.
    pub node: Option<NodeConfig>,
    /// Passthrough role.
    pub passthrough: bool,
}

impl ContainerRole {
    /// Neither role: a structural container the builder skips.
    pub const PLAIN: Self = Self {
        node: None,
        passthrough: false,
    };

    /// Passthrough role only.
    pub const PASSTHROUGH: Self = Self {
        node: None,
        passthrough: true,
    };

    /// Node role with the given flags.
    #[must_use]
    pub const fn node(config: NodeConfig) -> Self {
        Self {
            node: Some(config),
            passthrough: false,
        }
    }
}

/// Read access to a toolkit's containment hierarchy, plus the one mutation
/// the builder needs.
pub trait Hierarchy {
    /// Opaque container handle.
    type Container: Copy + PartialEq + fmt::Debug;

    /// The top-level container.
    fn root(&self) -> Self::Container;

    /// Direct children of `container`, in order.
    fn children(&self, container: Self::Container) -> impl Iterator<Item = Self::Container> + '_;

    /// Roles declared on `container`.
    fn role(&self, container: Self::Container) -> ContainerRole;

    /// Whether `container` carries its own visual image.
    fn has_image(&self, container: Self::Container) -> bool;

    /// Display name of `container`.
    fn name(&self, container: Self::Container) -> &str;

    /// Activates or deactivates `container`.
    fn set_active(&mut self, container: Self::Container, active: bool);
}

/// Fatal setup error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineageError {
    /// A passthrough container carries its own image.
    PassthroughWithImage {
        /// Name of the offending container.
        name: String,
    },
    /// The network was already prepared.
    AlreadyPrepared,
    /// The requested start container did not resolve to a stable node.
    UnknownStart {
        /// Name of the requested container.
        name: String,
    },
}

impl fmt::Display for LineageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassthroughWithImage { name } => {
                write!(f, "passthrough container `{name}` must not carry an image")
            }
            Self::AlreadyPrepared => write!(f, "network already prepared"),
            Self::UnknownStart { name } => {
                write!(f, "start container `{name}` is not a navigation node")
            }
        }
    }
}

impl core::error::Error for LineageError {}

/// Result of a lineage build: which node each container became.
#[derive(Clone, Debug)]
pub struct Lineage<C> {
    root: NodeId,
    nodes: Vec<(C, NodeId)>,
}

impl<C: Copy + PartialEq> Lineage<C> {
    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node created for `container`, if it declared a role.
    #[must_use]
    pub fn node_for(&self, container: C) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(c, _)| *c == container)
            .map(|&(_, id)| id)
    }

    /// The container a node was created from.
    #[must_use]
    pub fn container_for(&self, node: NodeId) -> Option<C> {
        self.nodes
            .iter()
            .find(|(_, id)| *id == node)
            .map(|&(c, _)| c)
    }

    /// Every `(container, node)` pair in discovery order.
    #[must_use]
    pub fn pairs(&self) -> &[(C, NodeId)] {
        &self.nodes
    }
}

/// Activates every container in the hierarchy.
pub fn activate_all<H: Hierarchy>(hierarchy: &mut H) {
    let mut stack = alloc::vec![hierarchy.root()];
    while let Some(container) = stack.pop() {
        hierarchy.set_active(container, true);
        let kids: Vec<_> = hierarchy.children(container).collect();
        stack.extend(kids.into_iter().rev());
    }
}

/// Walks `hierarchy` once and creates the matching nodes in `store`.
///
/// Fails before touching `store` if any passthrough container carries an
/// image.
pub fn build_lineage<H: Hierarchy>(
    hierarchy: &H,
    store: &mut NodeStore,
    tracer: &mut Tracer,
) -> Result<Lineage<H::Container>, LineageError> {
    check_passthrough_images(hierarchy, hierarchy.root())?;

    let root_container = hierarchy.root();
    let mut root_config = hierarchy.role(root_container).node.unwrap_or_default();
    root_config.hide_on_further_open = false;
    let root = store.create_node(NodeKind::Stable, hierarchy.name(root_container), root_config);
    tracer.lineage(&LineageEvent {
        node: root,
        kind: NodeKind::Stable,
        parent: None,
        passthrough: None,
        depth: 0,
    });

    let mut builder = Builder {
        hierarchy,
        store,
        tracer,
        nodes: alloc::vec![(root_container, root)],
    };
    builder.walk(root_container, root, None, 1);

    Ok(Lineage {
        root,
        nodes: builder.nodes,
    })
}

fn check_passthrough_images<H: Hierarchy>(
    hierarchy: &H,
    container: H::Container,
) -> Result<(), LineageError> {
    if hierarchy.role(container).passthrough && hierarchy.has_image(container) {
        return Err(LineageError::PassthroughWithImage {
            name: hierarchy.name(container).into(),
        });
    }
    for child in hierarchy.children(container) {
        check_passthrough_images(hierarchy, child)?;
    }
    Ok(())
}

struct Builder<'a, H: Hierarchy> {
    hierarchy: &'a H,
    store: &'a mut NodeStore,
    tracer: &'a mut Tracer,
    nodes: Vec<(H::Container, NodeId)>,
}

impl<H: Hierarchy> Builder<'_, H> {
    fn walk(
        &mut self,
        container: H::Container,
        parent: NodeId,
        passthrough: Option<NodeId>,
        depth: u32,
    ) {
        let hierarchy = self.hierarchy;
        for child in hierarchy.children(container) {
            let role = hierarchy.role(child);
            if let Some(config) = role.node {
                let id = self.create(child, NodeKind::Stable, config, parent, passthrough, depth);
                self.walk(child, id, None, depth + 1);
            } else if role.passthrough {
                let id = self.create(
                    child,
                    NodeKind::Passthrough,
                    NodeConfig::PLAIN,
                    parent,
                    passthrough,
                    depth,
                );
                self.walk(child, parent, Some(id), depth + 1);
            } else {
                self.walk(child, parent, passthrough, depth + 1);
            }
        }
    }

    fn create(
        &mut self,
        container: H::Container,
        kind: NodeKind,
        config: NodeConfig,
        parent: NodeId,
        passthrough: Option<NodeId>,
        depth: u32,
    ) -> NodeId {
        let id = self
            .store
            .create_node(kind, self.hierarchy.name(container), config);
        self.store.attach(id, parent, passthrough);
        self.tracer.lineage(&LineageEvent {
            node: id,
            kind,
            parent: Some(parent),
            passthrough,
            depth,
        });
        self.nodes.push((container, id));
        id
    }
}

// ---------------------------------------------------------------------------
// SceneTree
// ---------------------------------------------------------------------------

/// Handle to a container in a [`SceneTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContainerId(u32);

#[derive(Clone, Debug)]
struct Container {
    name: String,
    children: Vec<ContainerId>,
    role: ContainerRole,
    image: bool,
    active: bool,
}

/// In-memory containment hierarchy.
#[derive(Clone, Debug)]
pub struct SceneTree {
    containers: Vec<Container>,
}

impl SceneTree {
    /// Creates a tree whose root container declares a node role.
    #[must_use]
    pub fn new(root_name: impl Into<String>, config: NodeConfig) -> Self {
        Self {
            containers: alloc::vec![Container {
                name: root_name.into(),
                children: Vec::new(),
                role: ContainerRole::node(config),
                image: false,
                active: false,
            }],
        }
    }

    /// The root container.
    #[must_use]
    pub fn root(&self) -> ContainerId {
        ContainerId(0)
    }

    /// Adds a container with explicit roles under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not issued by this tree.
    pub fn add(
        &mut self,
        parent: ContainerId,
        name: impl Into<String>,
        role: ContainerRole,
    ) -> ContainerId {
        assert!(
            (parent.0 as usize) < self.containers.len(),
            "unknown ContainerId: {parent:?}"
        );
        #[expect(
            clippy::cast_possible_truncation,
            reason = "container count is bounded well below u32::MAX"
        )]
        let id = ContainerId(self.containers.len() as u32);
        self.containers.push(Container {
            name: name.into(),
            children: Vec::new(),
            role,
            image: false,
            active: false,
        });
        self.containers[parent.0 as usize].children.push(id);
        id
    }

    /// Adds a navigation node container.
    pub fn add_node(
        &mut self,
        parent: ContainerId,
        name: impl Into<String>,
        config: NodeConfig,
    ) -> ContainerId {
        self.add(parent, name, ContainerRole::node(config))
    }

    /// Adds a passthrough container.
    pub fn add_passthrough(&mut self, parent: ContainerId, name: impl Into<String>) -> ContainerId {
        self.add(parent, name, ContainerRole::PASSTHROUGH)
    }

    /// Adds a container with no role.
    pub fn add_plain(&mut self, parent: ContainerId, name: impl Into<String>) -> ContainerId {
        self.add(parent, name, ContainerRole::PLAIN)
    }

    /// Marks whether `container` carries its own image.
    pub fn set_image(&mut self, container: ContainerId, image: bool) {
        self.containers[container.0 as usize].image = image;
    }

    /// Whether `container` has been activated.
    #[must_use]
    pub fn is_active(&self, container: ContainerId) -> bool {
        self.containers[container.0 as usize].active
    }

    /// Finds the first container with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ContainerId> {
        self.containers
            .iter()
            .position(|c| c.name == name)
            .and_then(|idx| u32::try_from(idx).ok())
            .map(ContainerId)
    }
}

impl Hierarchy for SceneTree {
    type Container = ContainerId;

    fn root(&self) -> ContainerId {
        ContainerId(0)
    }

    fn children(&self, container: ContainerId) -> impl Iterator<Item = ContainerId> + '_ {
        self.containers[container.0 as usize].children.iter().copied()
    }

    fn role(&self, container: ContainerId) -> ContainerRole {
        self.containers[container.0 as usize].role
    }

    fn has_image(&self, container: ContainerId) -> bool {
        self.containers[container.0 as usize].image
    }

    fn name(&self, container: ContainerId) -> &str {
        &self.containers[container.0 as usize].name
    }

    fn set_active(&mut self, container: ContainerId, active: bool) {
        self.containers[container.0 as usize].active = active;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn build(tree: &SceneTree) -> (NodeStore, Lineage<ContainerId>) {
        let mut store = NodeStore::new();
        let lineage = build_lineage(tree, &mut store, &mut Tracer::none()).unwrap();
        (store, lineage)
    }

    #[test]
    fn passthrough_is_skipped_in_children() {
        let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
        let pa = tree.add_passthrough(tree.root(), "PassthroughA");
        let x = tree.add_node(pa, "NodeX", NodeConfig::PLAIN);
        let (store, lineage) = build(&tree);

        let root = lineage.root();
        let pa = lineage.node_for(pa).unwrap();
        let x = lineage.node_for(x).unwrap();
        assert_eq!(store.parent(x), Some(root));
        assert_eq!(store.ancestor_passthrough(x), Some(pa));
        assert_eq!(store.children(root).collect::<Vec<_>>(), vec![x]);
        assert_eq!(store.kind(pa), NodeKind::Passthrough);
    }

    #[test]
    fn plain_containers_are_transparent() {
        let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
        let layout = tree.add_plain(tree.root(), "Layout");
        let inner = tree.add_plain(layout, "Inner");
        let a = tree.add_node(inner, "A", NodeConfig::PLAIN);
        let b = tree.add_node(layout, "B", NodeConfig::PLAIN);
        let (store, lineage) = build(&tree);

        let a = lineage.node_for(a).unwrap();
        let b = lineage.node_for(b).unwrap();
        assert_eq!(store.children(lineage.root()).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(lineage.node_for(layout), None);
    }

    #[test]
    fn lineage_maps_both_ways_in_discovery_order() {
        let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
        let layout = tree.add_plain(tree.root(), "Layout");
        let a = tree.add_node(layout, "A", NodeConfig::PLAIN);
        let b = tree.add_node(tree.root(), "B", NodeConfig::PLAIN);
        let (_store, lineage) = build(&tree);

        let containers: Vec<ContainerId> = lineage.pairs().iter().map(|&(c, _)| c).collect();
        assert_eq!(containers, vec![tree.root(), a, b]);
        for &(container, node) in lineage.pairs() {
            assert_eq!(lineage.container_for(node), Some(container));
            assert_eq!(lineage.node_for(container), Some(node));
        }
        assert_eq!(lineage.container_for(lineage.root()), Some(tree.root()));
    }

    #[test]
    fn passthrough_chains_are_transitive() {
        let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
        let q = tree.add_passthrough(tree.root(), "Q");
        let p = tree.add_passthrough(q, "P");
        let n = tree.add_node(p, "N", NodeConfig::PLAIN);
        let deeper = tree.add_node(n, "Deeper", NodeConfig::PLAIN);
        let (store, lineage) = build(&tree);

        let q = lineage.node_for(q).unwrap();
        let p = lineage.node_for(p).unwrap();
        let n = lineage.node_for(n).unwrap();
        let deeper = lineage.node_for(deeper).unwrap();
        assert_eq!(store.ancestor_passthrough(n), Some(p));
        assert_eq!(store.ancestor_passthrough(p), Some(q));
        assert_eq!(store.ancestor_passthrough(q), None);
        // Passthrough resets below a stable node.
        assert_eq!(store.parent(deeper), Some(n));
        assert_eq!(store.ancestor_passthrough(deeper), None);
    }

    #[test]
    fn co_located_roles_resolve_to_stable() {
        let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
        let both = tree.add(
            tree.root(),
            "Both",
            ContainerRole {
                node: Some(NodeConfig::PLAIN),
                passthrough: true,
            },
        );
        let (store, lineage) = build(&tree);
        let both = lineage.node_for(both).unwrap();
        assert_eq!(store.kind(both), NodeKind::Stable);
        assert_eq!(store.children(lineage.root()).collect::<Vec<_>>(), vec![both]);
    }

    #[test]
    fn passthrough_with_image_is_fatal() {
        let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
        let pt = tree.add_passthrough(tree.root(), "Overlay");
        tree.set_image(pt, true);

        let mut store = NodeStore::new();
        let err = build_lineage(&tree, &mut store, &mut Tracer::none()).unwrap_err();
        assert_eq!(
            err,
            LineageError::PassthroughWithImage {
                name: "Overlay".into()
            }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn root_never_hides_on_further_open() {
        let tree = SceneTree::new("Root", NodeConfig::SCREEN);
        let (store, lineage) = build(&tree);
        let config = store.config(lineage.root());
        assert!(!config.hide_on_further_open);
        assert!(config.hide_siblings_on_open);
    }

    #[test]
    fn activate_all_reaches_every_container() {
        let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
        let a = tree.add_plain(tree.root(), "A");
        let b = tree.add_node(a, "B", NodeConfig::PLAIN);
        activate_all(&mut tree);
        assert!(tree.is_active(tree.root()));
        assert!(tree.is_active(a));
        assert!(tree.is_active(b));
    }

    #[test]
    fn error_messages_name_the_container() {
        let err = LineageError::UnknownStart { name: "Menu".into() };
        assert_eq!(
            alloc::format!("{err}"),
            "start container `Menu` is not a navigation node"
        );
    }
}
