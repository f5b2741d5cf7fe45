// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON timeline export for segue
//! diagnostics.
//!
//! This crate provides [`TraceSink`](segue_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`] — compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`timeline::export`] — writes Chrome Trace Event Format JSON from
//!   recorded bytes, with one track per node.
//!
//! Sinks are installed with
//! [`Network::set_trace_sink`](segue_core::network::Network::set_trace_sink).
//! Wrap a sink in `Rc<RefCell<_>>` to keep a handle to it after installing.

pub mod pretty;
pub mod recorder;
pub mod timeline;
