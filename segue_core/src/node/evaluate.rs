// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern for each dirty channel:
//!
//! 1. **OPACITY** — Drain dirty indices, recompute each node's
//!    `effective_opacity` as `visual_parent_effective * local_opacity`.
//!    A node flagged `ignore_parent` inherits nothing.
//! 2. **INTERACTION** — Drain dirty indices, recompute
//!    `effective_interactable` as the parent's value AND the node's own
//!    `interactable && blocks_raycasts`.
//! 3. **POSITION** / **VISIBILITY** — Drain dirty indices (no
//!    recomputation; presenters read the current values from the store).
//!
//! [`VisualChanges`] uses raw slot indices (`u32`) so that presenters can
//! index directly via the `*_at()` accessors.

use alloc::vec::Vec;

use super::id::INVALID;
use super::store::NodeStore;
use crate::dirty;

/// The set of changes produced by a single [`NodeStore::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct VisualChanges {
    /// Nodes whose effective opacity was recomputed.
    pub opacities: Vec<u32>,
    /// Nodes whose effective interactivity was recomputed.
    pub interaction: Vec<u32>,
    /// Nodes whose anchored position changed.
    pub positions: Vec<u32>,
    /// Nodes whose `shown` flag flipped.
    pub visibility: Vec<u32>,
}

impl VisualChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.opacities.clear();
        self.interaction.clear();
        self.positions.clear();
        self.visibility.clear();
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opacities.is_empty()
            && self.interaction.is_empty()
            && self.positions.is_empty()
            && self.visibility.is_empty()
    }
}

impl NodeStore {
    /// Evaluates the node tree, recomputing dirty inherited properties and
    /// returning the set of changes.
    pub fn evaluate(&mut self) -> VisualChanges {
        let mut changes = VisualChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut VisualChanges) {
        changes.clear();

        let dirty_opacities: Vec<u32> = self
            .dirty
            .drain(dirty::OPACITY)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_opacities {
            let vp = self.inherited_parent(idx);
            let parent_opacity = if vp != INVALID {
                self.effective_opacity[vp as usize]
            } else {
                1.0
            };
            self.effective_opacity[idx as usize] = parent_opacity * self.opacity[idx as usize];
        }
        changes.opacities = dirty_opacities;

        let dirty_interaction: Vec<u32> = self
            .dirty
            .drain(dirty::INTERACTION)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_interaction {
            let vp = self.inherited_parent(idx);
            let parent_ok = vp == INVALID || self.effective_interactable[vp as usize];
            let own = self.interactable[idx as usize] && self.blocks_raycasts[idx as usize];
            self.effective_interactable[idx as usize] = parent_ok && own;
        }
        changes.interaction = dirty_interaction;

        changes.positions = self
            .dirty
            .drain(dirty::POSITION)
            .deterministic()
            .run()
            .collect();

        changes.visibility = self
            .dirty
            .drain(dirty::VISIBILITY)
            .deterministic()
            .run()
            .collect();
    }

    /// Visual parent to inherit from, or `INVALID` when the node ignores it.
    fn inherited_parent(&self, idx: u32) -> u32 {
        if self.ignore_parent[idx as usize] {
            INVALID
        } else {
            self.visual_parent[idx as usize]
        }
    }
}
