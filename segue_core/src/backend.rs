// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation contract for widget toolkits.
//!
//! The core never draws. Each frame the host advances transitions, evaluates
//! the node store, and hands the resulting [`VisualChanges`] to a
//! [`Presenter`]. Toolkits that expose a per-panel widget handle implement
//! the smaller [`Surface`] trait and wrap it in a [`SurfacePresenter`].
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(dt: Duration) {
//!     // Animate: step every in-flight transition
//!     network.advance(dt);
//!
//!     // Evaluate + present: drain dirty channels and push them out
//!     network.present(&mut presenter);
//! }
//! ```

use kurbo::Point;

use crate::node::{NodeId, NodeStore, VisualChanges};

/// Applies evaluated visual changes to a toolkit-native widget tree.
pub trait Presenter {
    /// Applies the given [`VisualChanges`], reading current property values
    /// from `store` as needed.
    fn apply(&mut self, store: &NodeStore, changes: &VisualChanges);
}

/// Thin per-node widget binding.
pub trait Surface {
    /// Sets the opacity the widget should render with.
    fn set_opacity(&mut self, node: NodeId, opacity: f32);

    /// Moves the widget to `position` relative to its anchor.
    fn set_anchored_position(&mut self, node: NodeId, position: Point);

    /// Enables or disables interaction with the widget.
    fn set_interactable(&mut self, node: NodeId, interactable: bool);

    /// Enables or disables pointer hit-testing on the widget.
    fn set_raycast_blocking(&mut self, node: NodeId, blocking: bool);

    /// Called when the node's `shown` flag flips. Does nothing by default.
    fn set_shown(&mut self, node: NodeId, shown: bool) {
        _ = (node, shown);
    }
}

/// A [`Presenter`] that forwards each changed property to a [`Surface`].
///
/// Opacity and interactivity are forwarded as their *effective* values (the
/// product or conjunction over visual ancestors), so flat widget lists render
/// correctly. Raycast blocking and position are forwarded as local values.
#[derive(Debug, Default)]
pub struct SurfacePresenter<S> {
    surface: S,
}

impl<S: Surface> SurfacePresenter<S> {
    /// Wraps a surface.
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Returns the wrapped surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Returns the wrapped surface mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Unwraps the surface.
    pub fn into_inner(self) -> S {
        self.surface
    }
}

impl<S: Surface> Presenter for SurfacePresenter<S> {
    fn apply(&mut self, store: &NodeStore, changes: &VisualChanges) {
        for &idx in &changes.visibility {
            self.surface
                .set_shown(NodeId::from_index(idx), store.shown_at(idx));
        }
        for &idx in &changes.opacities {
            self.surface
                .set_opacity(NodeId::from_index(idx), store.effective_opacity_at(idx));
        }
        for &idx in &changes.positions {
            self.surface
                .set_anchored_position(NodeId::from_index(idx), store.position_at(idx));
        }
        for &idx in &changes.interaction {
            let node = NodeId::from_index(idx);
            self.surface
                .set_interactable(node, store.effective_interactable_at(idx));
            self.surface
                .set_raycast_blocking(node, store.blocks_raycasts_at(idx));
        }
    }
}
