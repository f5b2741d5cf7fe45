// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition data: timing curves, motion values, and per-direction metadata.
//!
//! A [`TransitionMeta`] describes how a node animates when it is shown or
//! hidden: a duration plus a [`TransitionValue`] (origin, offset, fade flag,
//! timing curve). A zero duration means "apply instantly".
//!
//! [`NavigationTransition`] pairs the hide motion of the node being left with
//! the show motion of the destination, and [`LinkedTransition`] lets a caller
//! drive an optional third node from an external progress value.

use core::time::Duration;

use kurbo::{Point, Vec2};

use crate::node::{NodeId, NodeStore};

/// Which way a node is transitioning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Becoming visible.
    Show,
    /// Becoming hidden.
    Hide,
}

/// Timing curve mapping linear progress in `[0, 1]` to eased progress.
///
/// Inputs are clamped before evaluation, so every curve is defined on the
/// whole real line.
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    /// Constant velocity.
    #[default]
    Linear,
    /// Quadratic, slow start.
    EaseIn,
    /// Quadratic, slow end.
    EaseOut,
    /// Quadratic, slow start and end.
    EaseInOut,
    /// Cubic, slower start than [`EaseIn`](Self::EaseIn).
    EaseInCubic,
    /// Cubic, slower end than [`EaseOut`](Self::EaseOut).
    EaseOutCubic,
    /// Ignores progress and always yields the given value.
    Constant(f64),
    /// Caller-supplied curve.
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// Evaluates the curve at `t`.
    #[must_use]
    pub fn eval(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Self::Constant(v) => v,
            Self::Custom(f) => f(t),
        }
    }
}

/// Motion description for one direction of a transition.
#[derive(Clone, Copy, Debug)]
pub struct TransitionValue {
    /// Interpolate opacity as well as position.
    pub fade: bool,
    /// Anchored position at the start of the motion.
    pub origin: Point,
    /// Displacement from `origin`; the motion ends at `origin + offset`.
    pub offset: Vec2,
    /// Curve applied to positional progress.
    pub timing: Easing,
    complete: bool,
}

impl TransitionValue {
    /// A positional motion from `origin` to `origin + offset`.
    #[must_use]
    pub const fn new(origin: Point, offset: Vec2, timing: Easing, fade: bool) -> Self {
        Self {
            fade,
            origin,
            offset,
            timing,
            complete: true,
        }
    }

    /// A value that carries no positional data.
    ///
    /// Its eased progress is always zero and a node animated with it keeps
    /// its current position; only the optional fade applies.
    #[must_use]
    pub const fn incomplete(fade: bool) -> Self {
        Self {
            fade,
            origin: Point::ZERO,
            offset: Vec2::ZERO,
            timing: Easing::Constant(1.0),
            complete: false,
        }
    }

    /// Whether this value carries positional data.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// End point of the motion.
    #[must_use]
    pub fn target(&self) -> Point {
        self.origin + self.offset
    }

    /// Eased positional progress for linear progress `t`.
    #[must_use]
    pub fn progress(&self, t: f64) -> f64 {
        if self.complete { self.timing.eval(t) } else { 0.0 }
    }

    /// Position at linear progress `t`.
    #[must_use]
    pub fn position_at(&self, t: f64) -> Point {
        self.origin.lerp(self.target(), self.progress(t))
    }
}

/// Duration plus motion for one direction of a node's transition.
#[derive(Clone, Copy, Debug)]
pub struct TransitionMeta {
    /// How long the motion runs. Zero applies the end state instantly.
    pub duration: Duration,
    /// What moves and how.
    pub value: TransitionValue,
}

impl TransitionMeta {
    /// Creates a meta from its parts.
    #[must_use]
    pub const fn new(duration: Duration, value: TransitionValue) -> Self {
        Self { duration, value }
    }

    /// The canonical "no transition": zero duration, no motion, no fade.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            duration: Duration::ZERO,
            value: TransitionValue::incomplete(false),
        }
    }

    /// A pure cross-fade of the given duration.
    #[must_use]
    pub const fn fade_only(duration: Duration) -> Self {
        Self {
            duration,
            value: TransitionValue::incomplete(true),
        }
    }

    /// Whether applying this meta starts an animation.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        !self.duration.is_zero()
    }

    /// Linear progress after `elapsed`, clamped to `[0, 1]`.
    #[must_use]
    pub fn linear_progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

impl Default for TransitionMeta {
    fn default() -> Self {
        Self::none()
    }
}

/// A paired transition for a navigation step.
///
/// `from` animates the node being navigated away from (as its hide
/// transition) and `to` animates the destination (as its show transition).
#[derive(Clone, Copy, Debug)]
pub struct NavigationTransition {
    /// Shared duration of both halves.
    pub duration: Duration,
    /// Hide motion for the node being left.
    pub from: TransitionValue,
    /// Show motion for the destination.
    pub to: TransitionValue,
    /// Drive this node with [`LinkedTransition`] instead of the destination.
    pub override_to: Option<NodeId>,
}

impl NavigationTransition {
    /// Creates a paired transition.
    #[must_use]
    pub const fn new(duration: Duration, from: TransitionValue, to: TransitionValue) -> Self {
        Self {
            duration,
            from,
            to,
            override_to: None,
        }
    }

    /// A transition that only fades the node being left.
    #[must_use]
    pub const fn non_offset(duration: Duration) -> Self {
        Self {
            duration,
            from: TransitionValue::incomplete(true),
            to: TransitionValue::incomplete(false),
            override_to: None,
        }
    }

    /// Routes the linked motion to `node` instead of the destination.
    #[must_use]
    pub const fn with_override(mut self, node: NodeId) -> Self {
        self.override_to = Some(node);
        self
    }

    /// Hide meta for the node being left.
    #[must_use]
    pub const fn from_meta(&self) -> TransitionMeta {
        TransitionMeta::new(self.duration, self.from)
    }

    /// Show meta for the destination.
    #[must_use]
    pub const fn to_meta(&self) -> TransitionMeta {
        TransitionMeta::new(self.duration, self.to)
    }

    /// Builds the externally driven half for `destination`, honoring
    /// [`override_to`](Self::override_to).
    #[must_use]
    pub fn linked(&self, destination: Option<NodeId>) -> LinkedTransition {
        LinkedTransition::new(self.override_to.or(destination), self.to)
    }
}

/// Drives an optional node toward a [`TransitionValue`]'s origin from a
/// caller-supplied progress value.
///
/// The motion runs backwards from `origin - offset` to `origin`, so the
/// value's origin is where the node rests once shown. Without a target node
/// every operation returns immediately.
#[derive(Clone, Copy, Debug)]
pub struct LinkedTransition {
    target: Option<NodeId>,
    value: TransitionValue,
    start: Point,
    end: Point,
}

impl LinkedTransition {
    /// Prepares a linked motion for `target`.
    #[must_use]
    pub fn new(target: Option<NodeId>, value: TransitionValue) -> Self {
        let end = value.origin;
        Self {
            target,
            value,
            start: end - value.offset,
            end,
        }
    }

    /// The driven node, if any.
    #[must_use]
    pub const fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Applies the state at `progress` in `[0, 1]`.
    pub fn step(&self, store: &mut NodeStore, show: bool, progress: f64) {
        let Some(node) = self.target else {
            return;
        };
        let progress = progress.clamp(0.0, 1.0);
        if self.value.fade {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "opacity is stored as f32; progress is in [0, 1]"
            )]
            let p = progress as f32;
            store.set_opacity(node, if show { p } else { 1.0 - p });
        }
        if self.value.is_complete() {
            store.set_position(
                node,
                self.start.lerp(self.end, self.value.progress(progress)),
            );
        }
    }

    /// Snaps to the resting state for `show`.
    pub fn finish(&self, store: &mut NodeStore, show: bool) {
        let Some(node) = self.target else {
            return;
        };
        store.set_opacity(node, if show { 1.0 } else { 0.0 });
        if self.value.is_complete() {
            store.set_position(node, self.end);
        }
    }
}
