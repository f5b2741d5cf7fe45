// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for navigation.
//!
//! This module provides a [`TraceSink`] trait with one method per event the
//! network emits. All method bodies default to no-ops, so implementing only
//! the events you care about is fine.
//!
//! [`Tracer`] owns an optional boxed sink. When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::time::Duration;

use crate::node::{NodeId, NodeKind};
use crate::runner::{RunToken, TransitionEvent};
use crate::transition::Direction;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which history operation was attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavigationOp {
    /// `register_navigation`.
    Register,
    /// `deregister_navigation`.
    Deregister,
    /// `navigate_to`.
    NavigateTo,
    /// `back`.
    Back,
    /// `home`.
    Home,
    /// `register_untracked`.
    RegisterUntracked,
    /// `deregister_untracked`.
    DeregisterUntracked,
}

impl NavigationOp {
    /// Stable lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Deregister => "deregister",
            Self::NavigateTo => "navigate_to",
            Self::Back => "back",
            Self::Home => "home",
            Self::RegisterUntracked => "register_untracked",
            Self::DeregisterUntracked => "deregister_untracked",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a history operation completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigationEvent {
    /// What was attempted.
    pub op: NavigationOp,
    /// The node the operation targeted, if any.
    pub node: Option<NodeId>,
    /// Whether it succeeded.
    pub succeeded: bool,
}

/// Emitted whenever a node is shown or hidden by the cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityEvent {
    /// The node.
    pub node: NodeId,
    /// New `shown` value.
    pub shown: bool,
    /// Whether a transition run was started.
    pub animated: bool,
}

/// Emitted when a transition run starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionStartEvent {
    /// The animated node.
    pub node: NodeId,
    /// Which way it moves.
    pub direction: Direction,
    /// The new run.
    pub token: RunToken,
    /// Planned duration.
    pub duration: Duration,
}

/// Emitted by the lineage builder for every node it creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineageEvent {
    /// The created node.
    pub node: NodeId,
    /// Its resolved kind.
    pub kind: NodeKind,
    /// Logical parent, if any.
    pub parent: Option<NodeId>,
    /// Nearest ancestor passthrough, if any.
    pub passthrough: Option<NodeId>,
    /// Containment depth (root is 0).
    pub depth: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the network.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a history operation.
    fn on_navigation(&mut self, e: &NavigationEvent) {
        _ = e;
    }

    /// Called with the history (bottom to top) after it changed.
    fn on_history(&mut self, history: &[NodeId]) {
        _ = history;
    }

    /// Called when the cascade shows or hides a node.
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        _ = e;
    }

    /// Called when a transition run starts.
    fn on_transition_start(&mut self, e: &TransitionStartEvent) {
        _ = e;
    }

    /// Called when a transition run finishes or is cancelled.
    fn on_transition_end(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called once per node created by the lineage builder.
    fn on_lineage(&mut self, e: &LineageEvent) {
        _ = e;
    }

    /// Called when the host advances transitions by `dt`.
    fn on_advance(&mut self, dt: Duration) {
        _ = dt;
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Rc<RefCell<S>> {
    fn on_navigation(&mut self, e: &NavigationEvent) {
        self.borrow_mut().on_navigation(e);
    }

    fn on_history(&mut self, history: &[NodeId]) {
        self.borrow_mut().on_history(history);
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.borrow_mut().on_visibility(e);
    }

    fn on_transition_start(&mut self, e: &TransitionStartEvent) {
        self.borrow_mut().on_transition_start(e);
    }

    fn on_transition_end(&mut self, e: &TransitionEvent) {
        self.borrow_mut().on_transition_end(e);
    }

    fn on_lineage(&mut self, e: &LineageEvent) {
        self.borrow_mut().on_lineage(e);
    }

    fn on_advance(&mut self, dt: Duration) {
        self.borrow_mut().on_advance(dt);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional owned [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing and
/// an installed sink is dropped. When **on**, each method checks the inner
/// `Option` (one branch) before dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits a [`NavigationEvent`].
    #[inline]
    pub fn navigation(&mut self, e: &NavigationEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_navigation(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a history snapshot.
    #[inline]
    pub fn history(&mut self, history: &[NodeId]) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_history(history);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = history;
        }
    }

    /// Emits a [`VisibilityEvent`].
    #[inline]
    pub fn visibility(&mut self, e: &VisibilityEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_visibility(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionStartEvent`].
    #[inline]
    pub fn transition_start(&mut self, e: &TransitionStartEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition_start(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a finished or cancelled run.
    #[inline]
    pub fn transition_end(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LineageEvent`].
    #[inline]
    pub fn lineage(&mut self, e: &LineageEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lineage(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a frame advance.
    #[inline]
    pub fn advance(&mut self, dt: Duration) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_advance(dt);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = dt;
        }
    }
}
