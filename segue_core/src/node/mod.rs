// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation node data model.
//!
//! A *node* is a navigable panel in the navigation tree. Each node has:
//!
//! - An identity ([`NodeId`]) and a [`NodeKind`]: stable nodes take part in
//!   history and parent/child navigation, passthrough nodes only relay
//!   visibility to the stable nodes beneath them.
//! - Topology: a logical parent, ordered logical children, and an optional
//!   nearest ancestor passthrough.
//! - **Local state** written by the cascade and the transition runner:
//!   `shown`, [`opacity`](NodeStore::set_opacity),
//!   [`position`](NodeStore::set_position),
//!   [`interactable`](NodeStore::set_interactable), and
//!   [`blocks_raycasts`](NodeStore::set_blocks_raycasts).
//! - **Computed state** produced by [`evaluate`](NodeStore::evaluate):
//!   `effective_opacity` and `effective_interactable`, inherited through the
//!   visual parent chain (which includes passthroughs).
//!
//! # Dirty tracking
//!
//! Mutations mark the corresponding channel in [`dirty`](crate::dirty).
//! Opacity and interaction propagate to visual descendants. Position and
//! visibility are local.

mod evaluate;
mod id;
mod store;
mod traverse;

pub use evaluate::VisualChanges;
pub use id::{INVALID, NodeConfig, NodeId, NodeKind};
pub use store::NodeStore;
pub use traverse::Children;
