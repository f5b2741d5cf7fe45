// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Nodes print
//! as `#index`, or as `name#index` when a name table is supplied.

use std::fmt::Write as _;
use std::io::Write;
use std::time::Duration;

use segue_core::node::{NodeId, NodeKind};
use segue_core::runner::{RunOutcome, TransitionEvent};
use segue_core::trace::{
    LineageEvent, NavigationEvent, TraceSink, TransitionStartEvent, VisibilityEvent,
};
use segue_core::transition::Direction;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    names: Vec<String>,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("names", &self.names.len())
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            names: Vec::new(),
        }
    }

    /// Supplies node names, indexed by [`NodeId::index`].
    ///
    /// Typically fed from
    /// [`NodeStore::names`](segue_core::node::NodeStore::names) after the
    /// lineage has been built.
    #[must_use]
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn node(&self, id: NodeId) -> String {
        match self.names.get(id.index() as usize) {
            Some(name) => format!("{name}#{}", id.index()),
            None => format!("#{}", id.index()),
        }
    }

    fn opt_node(&self, id: Option<NodeId>) -> String {
        id.map_or_else(|| "-".to_owned(), |id| self.node(id))
    }
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Show => "show",
        Direction::Hide => "hide",
    }
}

fn kind_name(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Stable => "stable",
        NodeKind::Passthrough => "passthrough",
    }
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_navigation(&mut self, e: &NavigationEvent) {
        let status = if e.succeeded { "ok" } else { "rejected" };
        let node = self.opt_node(e.node);
        let _ = writeln!(self.writer, "[nav] {} node={node} {status}", e.op.name());
    }

    fn on_history(&mut self, history: &[NodeId]) {
        let mut line = String::new();
        for (i, &id) in history.iter().enumerate() {
            if i > 0 {
                line.push_str(" > ");
            }
            let _ = write!(line, "{}", self.node(id));
        }
        let _ = writeln!(self.writer, "[history] depth={} {line}", history.len());
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        let tag = if e.shown { "show" } else { "hide" };
        let mode = if e.animated { "animated" } else { "instant" };
        let node = self.node(e.node);
        let _ = writeln!(self.writer, "[{tag}] {node} {mode}");
    }

    fn on_transition_start(&mut self, e: &TransitionStartEvent) {
        let node = self.node(e.node);
        let _ = writeln!(
            self.writer,
            "[transition:start] {node} {} token={} duration={:.1}ms",
            direction_name(e.direction),
            e.token.get(),
            ms(e.duration),
        );
    }

    fn on_transition_end(&mut self, e: &TransitionEvent) {
        let outcome = match e.outcome {
            RunOutcome::Finished => "finished",
            RunOutcome::Cancelled => "cancelled",
        };
        let node = self.node(e.node);
        let _ = writeln!(
            self.writer,
            "[transition:end] {node} {} token={} {outcome}",
            direction_name(e.direction),
            e.token.get(),
        );
    }

    fn on_lineage(&mut self, e: &LineageEvent) {
        let node = self.node(e.node);
        let parent = self.opt_node(e.parent);
        let passthrough = self.opt_node(e.passthrough);
        let _ = writeln!(
            self.writer,
            "[lineage] {node} {} parent={parent} passthrough={passthrough} depth={}",
            kind_name(e.kind),
            e.depth,
        );
    }

    fn on_advance(&mut self, dt: Duration) {
        let _ = writeln!(self.writer, "[advance] dt={:.1}ms", ms(dt));
    }
}
