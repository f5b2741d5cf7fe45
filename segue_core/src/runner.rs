// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick-driven transition runner.
//!
//! Each animating node owns at most one *run*: an `Animating` state with an
//! elapsed time, identified by a [`RunToken`]. The host advances every run
//! with [`TransitionRunner::advance`] once per frame. Starting a run on a
//! node that already has one cancels the old run first, so a retriggered
//! transition never races its predecessor.
//!
//! Sampling rules:
//!
//! - Position follows the eased progress of the [`TransitionValue`], and is
//!   only written when the value is complete.
//! - Opacity follows raw linear progress from the opacity at start to the
//!   direction's target (1 for show, 0 for hide) when the value fades. A
//!   non-fading run is forced to full opacity at start and snaps at the end.
//! - A show run disables interactivity for the node's logical lineage at
//!   start and re-enables it on completion or cancellation.
//! - A hide run returns its node to the value's origin on completion or
//!   cancellation.
//!
//! [`TransitionValue`]: crate::transition::TransitionValue

use alloc::vec::Vec;
use core::time::Duration;

use crate::node::{NodeId, NodeStore};
use crate::transition::{Direction, TransitionMeta};

/// Identifies one run of a transition.
///
/// Tokens are never reused within a runner, so a stale token can be told
/// apart from the node's current run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunToken(u64);

impl RunToken {
    /// Rebuilds a token from its raw value (used when decoding recordings).
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    /// The run reached its full duration and snapped to its end state.
    Finished,
    /// The run was cancelled before completion.
    Cancelled,
}

/// Reported when a run ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEvent {
    /// The animated node.
    pub node: NodeId,
    /// Which way it was moving.
    pub direction: Direction,
    /// The run that ended.
    pub token: RunToken,
    /// Whether it finished or was cancelled.
    pub outcome: RunOutcome,
}

#[derive(Clone, Copy, Debug)]
struct Run {
    node: NodeId,
    direction: Direction,
    meta: TransitionMeta,
    elapsed: Duration,
    initial_alpha: f32,
    token: RunToken,
}

impl Run {
    fn target_alpha(&self) -> f32 {
        match self.direction {
            Direction::Show => 1.0,
            Direction::Hide => 0.0,
        }
    }

    fn sample(&self, store: &mut NodeStore, t: f64) {
        let value = &self.meta.value;
        if value.is_complete() {
            store.set_position(self.node, value.position_at(t));
        }
        if value.fade {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "opacity is stored as f32; t is in [0, 1]"
            )]
            let t = t as f32;
            let alpha = self.initial_alpha + (self.target_alpha() - self.initial_alpha) * t;
            store.set_opacity(self.node, alpha);
        }
    }

    fn finish(&self, store: &mut NodeStore) {
        let value = &self.meta.value;
        store.set_opacity(self.node, self.target_alpha());
        match self.direction {
            Direction::Show => {
                if value.is_complete() {
                    store.set_position(self.node, value.target());
                }
                store.set_lineage_interactable(self.node, true);
            }
            Direction::Hide => {
                if value.is_complete() {
                    store.set_position(self.node, value.origin);
                }
            }
        }
    }

    fn event(&self, outcome: RunOutcome) -> TransitionEvent {
        TransitionEvent {
            node: self.node,
            direction: self.direction,
            token: self.token,
            outcome,
        }
    }
}

/// Drives every in-flight transition.
#[derive(Debug, Default)]
pub struct TransitionRunner {
    runs: Vec<Run>,
    next_token: u64,
}

impl TransitionRunner {
    /// Creates an idle runner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts animating `node` in `direction` and returns the new run's token.
    ///
    /// Any run already active on `node` is cancelled first. The progress-0
    /// state is applied immediately. A zero-duration meta completes on the
    /// next [`advance`](Self::advance).
    pub fn start(
        &mut self,
        store: &mut NodeStore,
        node: NodeId,
        direction: Direction,
        meta: TransitionMeta,
    ) -> RunToken {
        self.cancel(node, store);

        if direction == Direction::Show {
            store.set_lineage_interactable(node, false);
        }
        if !meta.value.fade {
            store.set_opacity(node, 1.0);
        }

        let token = RunToken(self.next_token);
        self.next_token += 1;
        let run = Run {
            node,
            direction,
            meta,
            elapsed: Duration::ZERO,
            initial_alpha: store.opacity(node),
            token,
        };
        run.sample(store, 0.0);
        self.runs.push(run);
        token
    }

    /// Advances every run by `dt` and returns the runs that finished.
    pub fn advance(&mut self, dt: Duration, store: &mut NodeStore) -> Vec<TransitionEvent> {
        let mut finished = Vec::new();
        self.runs.retain_mut(|run| {
            run.elapsed = run.elapsed.saturating_add(dt);
            let t = run.meta.linear_progress(run.elapsed);
            if t >= 1.0 {
                run.finish(store);
                finished.push(run.event(RunOutcome::Finished));
                false
            } else {
                run.sample(store, t);
                true
            }
        });
        finished
    }

    /// Cancels the active run on `node`. Returns `false` if the node was not
    /// animating.
    ///
    /// Opacity stays where the last sample put it. A cancelled show run gives
    /// interactivity back to the node's lineage. A cancelled hide run puts a
    /// complete value's node back at its origin.
    pub fn cancel(&mut self, node: NodeId, store: &mut NodeStore) -> bool {
        self.take(node, store).is_some()
    }

    /// Like [`cancel`](Self::cancel), but reports the cancelled run.
    pub fn cancel_with_event(
        &mut self,
        node: NodeId,
        store: &mut NodeStore,
    ) -> Option<TransitionEvent> {
        self.take(node, store)
            .map(|run| run.event(RunOutcome::Cancelled))
    }

    fn take(&mut self, node: NodeId, store: &mut NodeStore) -> Option<Run> {
        let pos = self.runs.iter().position(|r| r.node == node)?;
        let run = self.runs.swap_remove(pos);
        match run.direction {
            Direction::Show => store.set_lineage_interactable(node, true),
            Direction::Hide => {
                let value = &run.meta.value;
                if value.is_complete() {
                    store.set_position(node, value.origin);
                }
            }
        }
        Some(run)
    }

    /// Whether `node` has an active run.
    #[must_use]
    pub fn is_animating(&self, node: NodeId) -> bool {
        self.runs.iter().any(|r| r.node == node)
    }

    /// Token of the active run on `node`, if any.
    #[must_use]
    pub fn token(&self, node: NodeId) -> Option<RunToken> {
        self.runs.iter().find(|r| r.node == node).map(|r| r.token)
    }

    /// Number of active runs.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.runs.len()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::*;
    use crate::node::{NodeConfig, NodeKind};
    use crate::transition::{Easing, TransitionValue};

    fn one_node() -> (NodeStore, NodeId) {
        let mut store = NodeStore::new();
        let id = store.create_node(NodeKind::Stable, "panel", NodeConfig::PLAIN);
        (store, id)
    }

    fn slide(fade: bool) -> TransitionMeta {
        TransitionMeta::new(
            Duration::from_secs(1),
            TransitionValue::new(Point::ZERO, Vec2::new(100.0, 0.0), Easing::Linear, fade),
        )
    }

    #[test]
    fn show_converges_and_unlocks_at_end() {
        let (mut store, id) = one_node();
        let mut runner = TransitionRunner::new();
        runner.start(&mut store, id, Direction::Show, slide(false));

        assert_eq!(store.position(id), Point::new(0.0, 0.0));
        assert!(!store.is_interactable(id));

        let done = runner.advance(Duration::from_millis(500), &mut store);
        assert!(done.is_empty());
        assert_eq!(store.position(id), Point::new(50.0, 0.0));
        assert!(!store.is_interactable(id));

        let done = runner.advance(Duration::from_millis(500), &mut store);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].outcome, RunOutcome::Finished);
        assert_eq!(store.position(id), Point::new(100.0, 0.0));
        assert!(store.is_interactable(id));
        assert!(!runner.is_animating(id));
    }

    #[test]
    fn fade_interpolates_from_current_alpha() {
        let (mut store, id) = one_node();
        store.set_opacity(id, 0.0);
        let mut runner = TransitionRunner::new();
        runner.start(
            &mut store,
            id,
            Direction::Show,
            TransitionMeta::fade_only(Duration::from_secs(2)),
        );

        runner.advance(Duration::from_millis(500), &mut store);
        assert!((store.opacity(id) - 0.25).abs() < 1e-6);
        // Incomplete values never move the node.
        assert_eq!(store.position(id), Point::ZERO);
    }

    #[test]
    fn hide_ends_transparent_at_origin() {
        let (mut store, id) = one_node();
        let mut runner = TransitionRunner::new();
        runner.start(&mut store, id, Direction::Hide, slide(true));
        runner.advance(Duration::from_millis(250), &mut store);
        assert_eq!(store.position(id), Point::new(25.0, 0.0));
        assert!((store.opacity(id) - 0.75).abs() < 1e-6);

        runner.advance(Duration::from_secs(5), &mut store);
        assert_eq!(store.position(id), Point::ZERO);
        assert!(store.opacity(id).abs() < 1e-6);
    }

    #[test]
    fn retrigger_cancels_previous_run() {
        let (mut store, id) = one_node();
        let mut runner = TransitionRunner::new();
        let first = runner.start(&mut store, id, Direction::Show, slide(false));
        runner.advance(Duration::from_millis(500), &mut store);

        let second = runner.start(&mut store, id, Direction::Hide, slide(false));
        assert_ne!(first, second);
        assert_eq!(runner.active_count(), 1);
        assert_eq!(runner.token(id), Some(second));
        // The cancelled show run released the lineage lock.
        assert!(store.is_interactable(id));
    }

    #[test]
    fn cancel_reports_whether_a_run_existed() {
        let (mut store, id) = one_node();
        let mut runner = TransitionRunner::new();
        assert!(!runner.cancel(id, &mut store));

        let token = runner.start(&mut store, id, Direction::Show, slide(false));
        let event = runner.cancel_with_event(id, &mut store);
        assert_eq!(
            event,
            Some(TransitionEvent {
                node: id,
                direction: Direction::Show,
                token,
                outcome: RunOutcome::Cancelled,
            })
        );
        assert_eq!(runner.active_count(), 0);
        assert!(store.is_interactable(id));
    }

    #[test]
    fn cancelled_hide_returns_to_origin() {
        let (mut store, id) = one_node();
        let mut runner = TransitionRunner::new();
        runner.start(&mut store, id, Direction::Hide, slide(true));
        runner.advance(Duration::from_millis(500), &mut store);
        assert_eq!(store.position(id), Point::new(50.0, 0.0));

        assert!(runner.cancel(id, &mut store));
        assert_eq!(store.position(id), Point::ZERO);
        assert!((store.opacity(id) - 0.5).abs() < 1e-6, "opacity kept");
    }

    #[test]
    fn cancelled_show_keeps_sampled_position() {
        let (mut store, id) = one_node();
        let mut runner = TransitionRunner::new();
        runner.start(&mut store, id, Direction::Show, slide(false));
        runner.advance(Duration::from_millis(500), &mut store);

        assert!(runner.cancel(id, &mut store));
        assert_eq!(store.position(id), Point::new(50.0, 0.0));
    }

    #[test]
    fn show_locks_whole_lineage() {
        let mut store = NodeStore::new();
        let parent = store.create_node(NodeKind::Stable, "parent", NodeConfig::PLAIN);
        let child = store.create_node(NodeKind::Stable, "child", NodeConfig::PLAIN);
        store.attach(child, parent, None);

        let mut runner = TransitionRunner::new();
        runner.start(&mut store, parent, Direction::Show, slide(false));
        assert!(!store.is_interactable(child));
        runner.advance(Duration::from_secs(1), &mut store);
        assert!(store.is_interactable(child));
    }
}
