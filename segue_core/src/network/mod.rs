// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigation network: node store, history stack, and transition runner
//! behind one owner.
//!
//! All navigation runs synchronously on the caller's turn. The only
//! deferred work is transition sampling, which the host drives once per
//! frame through [`Network::advance`].
//!
//! # History
//!
//! History is a stack of visited nodes with the root at the bottom. The root
//! is never popped. Registering a node that is already present never pushes a
//! duplicate; it degrades to a jump back to that node.

mod cascade;
mod history;

use alloc::boxed::Box;
use core::time::Duration;

use crate::backend::Presenter;
use crate::lineage::{Hierarchy, Lineage, LineageError, activate_all, build_lineage};
use crate::node::{NodeId, NodeKind, NodeStore, VisualChanges};
use crate::runner::TransitionRunner;
use crate::trace::{NavigationEvent, NavigationOp, TraceSink, Tracer};

use history::History;

/// Which diagnostics the network emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Emit a [`NavigationEvent`] for every history operation.
    pub log_navigation: bool,
    /// Emit the full history after every change.
    pub log_history: bool,
}

impl NetworkConfig {
    /// Navigation events off, history snapshots on.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            log_navigation: false,
            log_history: true,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of one navigation tree and its history.
#[derive(Debug)]
pub struct Network {
    pub(crate) store: NodeStore,
    pub(crate) runner: TransitionRunner,
    history: History,
    root: Option<NodeId>,
    start: Option<NodeId>,
    config: NetworkConfig,
    pub(crate) tracer: Tracer,
}

impl Default for Network {
    fn default() -> Self {
        Self::new(NetworkConfig::new())
    }
}

impl Network {
    /// Creates an unprepared network with an empty store.
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            store: NodeStore::new(),
            runner: TransitionRunner::new(),
            history: History::default(),
            root: None,
            start: None,
            config,
            tracer: Tracer::none(),
        }
    }

    /// Wraps a hand-built store whose root is `root`.
    ///
    /// Nothing is shown and history stays empty; call
    /// [`register_navigation`](Self::register_navigation) on the root to
    /// begin navigating.
    ///
    /// # Panics
    ///
    /// Panics if `root` is unknown to `store` or is not a stable node.
    #[must_use]
    pub fn with_store(store: NodeStore, root: NodeId, config: NetworkConfig) -> Self {
        assert!(
            store.kind(root) == NodeKind::Stable,
            "root must be a stable node"
        );
        Self {
            root: Some(root),
            start: Some(root),
            store,
            ..Self::new(config)
        }
    }

    /// Installs a trace sink. Events reach it only with the `trace` feature.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    /// Removes the trace sink.
    pub fn clear_trace_sink(&mut self) {
        self.tracer = Tracer::none();
    }

    /// Builds the node tree from `hierarchy` and reveals the start node.
    ///
    /// Every container is activated, the lineage is built, and the whole tree
    /// is hidden. If `start` is `None` or the root, the root is registered.
    /// Otherwise the root is pushed as the history base, the start node's
    /// intermediate ancestors are shown outermost first without touching
    /// history, and the start node is registered.
    ///
    /// Runs once; a second call fails with [`LineageError::AlreadyPrepared`].
    pub fn prepare<H: Hierarchy>(
        &mut self,
        hierarchy: &mut H,
        start: Option<H::Container>,
    ) -> Result<Lineage<H::Container>, LineageError> {
        if self.root.is_some() {
            return Err(LineageError::AlreadyPrepared);
        }
        if let Some(container) = start
            && container != hierarchy.root()
            && hierarchy.role(container).node.is_none()
        {
            return Err(LineageError::UnknownStart {
                name: hierarchy.name(container).into(),
            });
        }

        activate_all(hierarchy);
        let lineage = build_lineage(&*hierarchy, &mut self.store, &mut self.tracer)?;
        let root = lineage.root();
        self.root = Some(root);

        let start_node = match start {
            None => root,
            Some(container) => lineage.node_for(container).ok_or_else(|| {
                LineageError::UnknownStart {
                    name: hierarchy.name(container).into(),
                }
            })?,
        };
        self.start = Some(start_node);

        self.hide(root, true);
        if start_node == root {
            self.register_navigation(root);
        } else {
            self.history.push(root);
            self.show(root, false);
            self.show_backwards_to_ancestor(start_node, root);
            self.register_navigation(start_node);
        }
        Ok(lineage)
    }

    // -- History operations --

    /// Pushes `node` and shows it.
    ///
    /// If `node` is already in history this is a jump: it behaves exactly as
    /// [`navigate_to`](Self::navigate_to) without force.
    pub fn register_navigation(&mut self, node: NodeId) -> bool {
        self.store.validate(node);
        if self.history.contains(node) {
            return self.navigate_to(node, false);
        }
        self.history.push(node);
        self.show(node, false);
        self.trace_navigation(NavigationOp::Register, Some(node), true);
        self.trace_history();
        true
    }

    /// Pops entries from the top down to `node`, keeping `offset` entries
    /// from `node` upward, hiding each popped entry, then shows the new top.
    ///
    /// With `offset == 0`, `node` itself is popped. With `offset == 1`,
    /// `node` becomes the top. Returns `false` without side effects if `node`
    /// is the root or is not in history.
    pub fn deregister_navigation(&mut self, node: NodeId, offset: usize) -> bool {
        self.store.validate(node);
        let succeeded = self.deregister_inner(node, offset);
        self.trace_navigation(NavigationOp::Deregister, Some(node), succeeded);
        succeeded
    }

    fn deregister_inner(&mut self, node: NodeId, offset: usize) -> bool {
        if Some(node) == self.root {
            return false;
        }
        let Some(index) = self.history.position(node) else {
            return false;
        };
        let count = self.history.len().saturating_sub(index + offset);
        for _ in 0..count {
            if let Some(popped) = self.history.pop() {
                self.hide(popped, true);
            }
        }
        if let Some(top) = self.history.top() {
            self.show(top, false);
        }
        self.trace_history();
        true
    }

    /// Jumps back to `node` if it is in history, popping everything above it.
    ///
    /// If `node` is not in history and `force` is set, registers it instead.
    pub fn navigate_to(&mut self, node: NodeId, force: bool) -> bool {
        self.store.validate(node);
        let succeeded = if self.deregister_inner(node, 1) {
            true
        } else if force && !self.history.contains(node) {
            self.register_navigation(node)
        } else {
            false
        };
        self.trace_navigation(NavigationOp::NavigateTo, Some(node), succeeded);
        succeeded
    }

    /// Pops the current top and shows the entry below it.
    ///
    /// Fails when history holds one entry or fewer.
    pub fn back(&mut self) -> bool {
        let succeeded = match self.history.top() {
            Some(top) if self.history.len() > 1 => self.deregister_inner(top, 0),
            _ => false,
        };
        self.trace_navigation(NavigationOp::Back, None, succeeded);
        succeeded
    }

    /// Pops every entry above the root and shows the root.
    ///
    /// Fails if the root is not at the bottom of history.
    pub fn home(&mut self) -> bool {
        let succeeded = match self.root {
            Some(root) if self.history.position(root) == Some(0) => {
                while self.history.len() > 1 {
                    if let Some(popped) = self.history.pop() {
                        self.hide(popped, true);
                    }
                }
                self.show(root, false);
                self.trace_history();
                true
            }
            _ => false,
        };
        self.trace_navigation(NavigationOp::Home, self.root, succeeded);
        succeeded
    }

    /// The entry directly below the current top, if history holds at least
    /// two entries.
    #[must_use]
    pub fn peek_last(&self) -> Option<NodeId> {
        self.history.below_top()
    }

    /// Shows `node` outside the history stack.
    pub fn register_untracked(&mut self, node: NodeId) -> bool {
        self.show(node, false);
        self.history.track_untracked(node);
        self.trace_navigation(NavigationOp::RegisterUntracked, Some(node), true);
        true
    }

    /// Hides a node shown with [`register_untracked`](Self::register_untracked).
    pub fn deregister_untracked(&mut self, node: NodeId) -> bool {
        self.hide(node, true);
        self.history.forget_untracked(node);
        self.trace_navigation(NavigationOp::DeregisterUntracked, Some(node), true);
        true
    }

    // -- Frame loop --

    /// Advances every in-flight transition by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.tracer.advance(dt);
        for event in self.runner.advance(dt, &mut self.store) {
            self.tracer.transition_end(&event);
        }
    }

    /// Evaluates the node store and returns the changes since the last call.
    pub fn evaluate(&mut self) -> VisualChanges {
        self.store.evaluate()
    }

    /// Evaluates and hands the changes to `presenter`.
    pub fn present(&mut self, presenter: &mut impl Presenter) {
        let changes = self.store.evaluate();
        presenter.apply(&self.store, &changes);
    }

    // -- Accessors --

    /// The node store.
    #[must_use]
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// The node store, mutably.
    pub fn store_mut(&mut self) -> &mut NodeStore {
        &mut self.store
    }

    /// The transition runner.
    #[must_use]
    pub fn runner(&self) -> &TransitionRunner {
        &self.runner
    }

    /// History, bottom (root) first.
    #[must_use]
    pub fn history(&self) -> &[NodeId] {
        self.history.entries()
    }

    /// Nodes currently shown outside history.
    #[must_use]
    pub fn untracked(&self) -> &[NodeId] {
        self.history.untracked()
    }

    /// Top of history.
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        self.history.top()
    }

    /// The root node, once prepared.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The start node, once prepared.
    #[must_use]
    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    /// The diagnostics configuration.
    #[must_use]
    pub fn config(&self) -> NetworkConfig {
        self.config
    }

    // -- Tracing helpers --

    fn trace_navigation(&mut self, op: NavigationOp, node: Option<NodeId>, succeeded: bool) {
        if self.config.log_navigation {
            self.tracer.navigation(&NavigationEvent {
                op,
                node,
                succeeded,
            });
        }
    }

    fn trace_history(&mut self) {
        if self.config.log_history {
            self.tracer.history(self.history.entries());
        }
    }
}
