// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Every visual mutation on a [`NodeStore`](crate::node::NodeStore) marks one
//! of these channels (via [`understory_dirty`]). Evaluation drains them into
//! [`VisualChanges`](crate::node::VisualChanges), which a
//! [`Presenter`](crate::backend::Presenter) consumes.
//!
//! # Propagation semantics
//!
//! - **Propagating** — [`OPACITY`] and [`INTERACTION`] carry dependency edges
//!   from each node to its *visual* parent (the nearest enclosing node of
//!   either kind) and are marked with
//!   [`EagerPolicy`](understory_dirty::EagerPolicy). Effective opacity and
//!   effective interactivity are inherited, so a change must reach every
//!   visual descendant.
//!
//! - **Local-only** — [`POSITION`] and [`VISIBILITY`] only report the node
//!   that was touched.

use understory_dirty::Channel;

/// Local opacity changed; effective opacity of visual descendants must be
/// recomputed.
pub const OPACITY: Channel = Channel::new(0);

/// Interactable or raycast-blocking state changed; effective interactivity of
/// visual descendants must be recomputed.
pub const INTERACTION: Channel = Channel::new(1);

/// Anchored position changed.
pub const POSITION: Channel = Channel::new(2);

/// The `shown` flag flipped.
pub const VISIBILITY: Channel = Channel::new(3);
