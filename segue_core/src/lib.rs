// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical, history-tracked panel navigation.
//!
//! `segue_core` manages a tree of navigable panels (*nodes*), a history
//! stack of visited nodes, the cascade of show/hide side effects between
//! them, and the animated transitions that accompany each change. It is
//! `no_std` compatible (with `alloc`) and never draws: visual state is
//! evaluated into change lists that a toolkit-specific presenter applies.
//!
//! # Architecture
//!
//! ```text
//!   Hierarchy (toolkit containment)
//!       │
//!       ▼
//!   build_lineage() ──► NodeStore (stable + passthrough nodes)
//!                           │
//!   Network::register / deregister / back / navigate_to
//!                           │
//!                           ▼
//!   Cascade (show / hide) ──► TransitionRunner::start()
//!                           │
//!   Network::advance(dt) ◄──┘
//!       │
//!       ▼
//!   NodeStore::evaluate() ──► VisualChanges ──► Presenter::apply()
//! ```
//!
//! **[`node`]** — Struct-of-arrays node store with index handles. Nodes are
//! either stable (members of the logical tree) or passthrough (structural
//! relays that only forward visibility).
//!
//! **[`lineage`]** — Resolves a toolkit's containment hierarchy into the
//! logical tree once at startup, skipping passthrough and plain containers.
//!
//! **[`network`]** — The history stack and the show/hide cascade.
//!
//! **[`runner`]** — Tick-driven transition state machine with one
//! cancellable run per node.
//!
//! **[`transition`]** — Timing curves and transition metadata.
//!
//! **[`behaviour`]** — Forward, public, back, and event navigation triggers.
//!
//! **[`reference`]** — The dependent reference contract.
//!
//! **[`dirty`]** — Dirty-tracking channels via `understory_dirty`.
//!
//! **[`backend`]** — [`Presenter`](backend::Presenter) and
//! [`Surface`](backend::Surface) traits for toolkit integration.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! navigation diagnostics, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod behaviour;
pub mod dirty;
pub mod lineage;
pub mod network;
pub mod node;
pub mod reference;
pub mod runner;
pub mod trace;
pub mod transition;
