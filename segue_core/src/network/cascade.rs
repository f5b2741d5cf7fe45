// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The show/hide cascade.
//!
//! `show` and `hide` are the only paths that flip a node's `shown` flag.
//! Each applies the node's own state change, then the flag-driven side
//! effects: sibling hiding, dependent reference broadcast, passthrough
//! forwarding, and child propagation.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use super::Network;
use crate::node::NodeId;
use crate::reference::DependentReference;
use crate::trace::{TransitionStartEvent, VisibilityEvent};
use crate::transition::{Direction, TransitionMeta};

impl Network {
    /// Shows `id`.
    ///
    /// 1. Sets `shown` and enables interaction and raycasts.
    /// 2. Starts the show transition, or applies full opacity (and the target
    ///    position, for a complete value) immediately.
    /// 3. Hides siblings if the node hides siblings on open.
    /// 4. Activates dependent references unless the node suppresses them.
    /// 5. Shows the ancestor passthrough, if any.
    /// 6. Shows every child (recursively) if `show_children` is set or the
    ///    node always shows children.
    pub fn show(&mut self, id: NodeId, show_children: bool) {
        self.cancel_run(id);
        self.store.set_shown(id, true);
        self.store.set_blocks_raycasts(id, true);
        self.store.set_interactable(id, true);

        let meta = self.store.transition(id, Direction::Show);
        let animated = meta.is_animated();
        if animated {
            self.start_run(id, Direction::Show, meta);
        } else {
            self.store.set_opacity(id, 1.0);
            if meta.value.is_complete() {
                self.store.set_position(id, meta.value.target());
            }
        }
        self.tracer.visibility(&VisibilityEvent {
            node: id,
            shown: true,
            animated,
        });

        let config = self.store.config(id);
        if config.hide_siblings_on_open {
            self.hide_siblings(id);
        }
        if !config.deactivate_references_on_open {
            self.store.set_reference_status(id, true);
        }
        if let Some(passthrough) = self.store.ancestor_passthrough(id) {
            self.show(passthrough, false);
        }
        if show_children || config.always_show_children {
            self.show_children(id);
        }
    }

    /// Hides `id`.
    ///
    /// 1. Clears `shown` and disables interaction and raycasts.
    /// 2. Starts the hide transition, or drops opacity to zero immediately.
    /// 3. Deactivates dependent references.
    /// 4. Hides the ancestor passthrough, if any.
    /// 5. Hides every child if `hide_children` is set.
    pub fn hide(&mut self, id: NodeId, hide_children: bool) {
        self.cancel_run(id);
        self.store.set_shown(id, false);
        self.store.set_blocks_raycasts(id, false);
        self.store.set_interactable(id, false);

        let meta = self.store.transition(id, Direction::Hide);
        let animated = meta.is_animated();
        if animated {
            self.start_run(id, Direction::Hide, meta);
        } else {
            self.store.set_opacity(id, 0.0);
        }
        self.tracer.visibility(&VisibilityEvent {
            node: id,
            shown: false,
            animated,
        });

        self.store.set_reference_status(id, false);
        if let Some(passthrough) = self.store.ancestor_passthrough(id) {
            self.hide(passthrough, true);
        }
        if hide_children {
            self.hide_children(id);
        }
    }

    /// Shows every child of `id`, each with its own children.
    pub fn show_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.store.children(id).collect();
        for child in children {
            self.show(child, true);
        }
    }

    /// Hides every child of `id`, each with its own children.
    pub fn hide_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.store.children(id).collect();
        for child in children {
            self.hide(child, true);
        }
    }

    /// Hides every sibling of `id`.
    pub fn hide_siblings(&mut self, id: NodeId) {
        let siblings: Vec<NodeId> = self.store.siblings(id).collect();
        for sibling in siblings {
            self.hide(sibling, true);
        }
    }

    /// Reflexive descendant test.
    #[must_use]
    pub fn is_parent_of(&self, id: NodeId, other: NodeId) -> bool {
        self.store.is_parent_of(id, other)
    }

    /// Opens `to` from `from` if `to` lies in `from`'s subtree.
    ///
    /// `from` steps aside if it hides on further open.
    pub fn open_forward(&mut self, from: NodeId, to: NodeId) -> bool {
        if !self.is_parent_of(from, to) {
            return false;
        }
        let hide_self = self.store.config(from).hide_on_further_open;
        self.open_public(from, to, hide_self)
    }

    /// Opens any node from `from`.
    ///
    /// `from` is hidden first when `hide_self` is set and it hides on further
    /// open. Then `to` is registered.
    pub fn open_public(&mut self, from: NodeId, to: NodeId, hide_self: bool) -> bool {
        if hide_self && self.store.config(from).hide_on_further_open {
            self.hide(from, true);
        }
        self.register_navigation(to)
    }

    /// Shows the logical ancestors of `id` strictly between it and
    /// `ancestor`, outermost first, without touching history.
    pub fn show_backwards_to_ancestor(&mut self, id: NodeId, ancestor: NodeId) {
        let mut chain = Vec::new();
        let mut cursor = self.store.parent(id);
        while let Some(node) = cursor {
            if node == ancestor {
                break;
            }
            chain.push(node);
            cursor = self.store.parent(node);
        }
        for node in chain.into_iter().rev() {
            self.show(node, false);
        }
    }

    /// Assigns `meta` as the `direction` transition of `id`, every
    /// descendant, and the ancestor passthrough chain.
    ///
    /// `None` resets to [`TransitionMeta::none`].
    pub fn propagate_transition(
        &mut self,
        id: NodeId,
        direction: Direction,
        meta: Option<TransitionMeta>,
    ) {
        let meta = meta.unwrap_or_default();
        self.store.set_transition(id, direction, meta);
        let children: Vec<NodeId> = self.store.children(id).collect();
        for child in children {
            self.propagate_transition(child, direction, Some(meta));
        }
        if let Some(passthrough) = self.store.ancestor_passthrough(id) {
            self.propagate_transition(passthrough, direction, Some(meta));
        }
    }

    /// Registers a dependent reference on `id`. Returns `false` if it was
    /// already registered.
    ///
    /// The node keeps only a weak handle.
    pub fn register_dependent_reference<R: DependentReference + 'static>(
        &mut self,
        id: NodeId,
        reference: &Rc<RefCell<R>>,
    ) -> bool {
        let reference: Rc<RefCell<dyn DependentReference>> = reference.clone();
        self.store.register_reference(id, &reference)
    }

    /// Activates (`true`) or deactivates (`false`) every dependent reference
    /// of `id`.
    pub fn set_dependent_reference_status(&mut self, id: NodeId, flag: bool) {
        self.store.set_reference_status(id, flag);
    }

    /// Sets interactivity on `id`, and on its whole lineage if `set_lineage`.
    pub fn toggle_interactivity(&mut self, id: NodeId, flag: bool, set_lineage: bool) {
        if set_lineage {
            self.store.set_lineage_interactable(id, flag);
        } else {
            self.store.set_interactable(id, flag);
        }
    }

    /// Makes `id` (and its whole lineage if `set_lineage`) ignore, or stop
    /// ignoring, inherited opacity and interactivity.
    pub fn toggle_ignore_parent(&mut self, id: NodeId, flag: bool, set_lineage: bool) {
        if set_lineage {
            self.store.set_lineage_ignore_parent(id, flag);
        } else {
            self.store.set_ignore_parent(id, flag);
        }
    }

    fn cancel_run(&mut self, id: NodeId) {
        if let Some(event) = self.runner.cancel_with_event(id, &mut self.store) {
            self.tracer.transition_end(&event);
        }
    }

    fn start_run(&mut self, id: NodeId, direction: Direction, meta: TransitionMeta) {
        let token = self.runner.start(&mut self.store, id, direction, meta);
        self.tracer.transition_start(&TransitionStartEvent {
            node: id,
            direction,
            token,
            duration: meta.duration,
        });
    }
}
