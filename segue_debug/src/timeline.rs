// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format timeline exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Recordings carry no wall-clock time. The timeline clock starts at zero and
//! moves forward by each recorded advance, so transitions show up as spans
//! whose length matches the frame time fed to the network.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};
use std::time::Duration;

use serde_json::{Value, json};

use segue_core::node::{NodeId, NodeKind};
use segue_core::runner::RunOutcome;
use segue_core::transition::Direction;

use crate::recorder::{RecordedEvent, decode};

/// Track used for events that do not belong to a single node.
const NETWORK_TID: i64 = -1;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Every node gets its own track, labelled from `names` (indexed by
/// [`NodeId::index`]) when an entry exists.
pub fn export<S: AsRef<str>>(
    bytes: &[u8],
    names: &[S],
    writer: &mut dyn Write,
) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut clock = Duration::ZERO;
    let label = |id: NodeId| match names.get(id.index() as usize) {
        Some(name) => format!("{}#{}", name.as_ref(), id.index()),
        None => format!("#{}", id.index()),
    };

    events.push(json!({
        "ph": "M",
        "name": "thread_name",
        "pid": 0,
        "tid": NETWORK_TID,
        "args": { "name": "network" },
    }));

    for recorded in decode(bytes) {
        let ts = us(clock);
        match recorded {
            RecordedEvent::Advance(dt) => {
                clock = clock.saturating_add(dt);
            }
            RecordedEvent::Lineage(e) => {
                events.push(json!({
                    "ph": "M",
                    "name": "thread_name",
                    "pid": 0,
                    "tid": e.node.index(),
                    "args": { "name": label(e.node) },
                }));
                events.push(json!({
                    "ph": "i",
                    "name": "Lineage",
                    "cat": "Lineage",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.node.index(),
                    "s": "t",
                    "args": {
                        "kind": kind_name(e.kind),
                        "parent": e.parent.map(label),
                        "passthrough": e.passthrough.map(label),
                        "depth": e.depth,
                    }
                }));
            }
            RecordedEvent::Navigation(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": e.op.name(),
                    "cat": "Navigation",
                    "ts": ts,
                    "pid": 0,
                    "tid": NETWORK_TID,
                    "s": "g",
                    "args": {
                        "node": e.node.map(label),
                        "succeeded": e.succeeded,
                    }
                }));
            }
            RecordedEvent::History(history) => {
                let stack: Vec<String> = history.iter().map(|&id| label(id)).collect();
                events.push(json!({
                    "ph": "i",
                    "name": "History",
                    "cat": "Navigation",
                    "ts": ts,
                    "pid": 0,
                    "tid": NETWORK_TID,
                    "s": "t",
                    "args": {
                        "depth": stack.len(),
                        "stack": stack,
                    }
                }));
            }
            RecordedEvent::Visibility(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": if e.shown { "Show" } else { "Hide" },
                    "cat": "Cascade",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.node.index(),
                    "s": "t",
                    "args": {
                        "animated": e.animated,
                    }
                }));
            }
            RecordedEvent::TransitionStart(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": direction_name(e.direction),
                    "cat": "Transition",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.node.index(),
                    "args": {
                        "token": e.token.get(),
                        "planned_ms": e.duration.as_secs_f64() * 1000.0,
                    }
                }));
            }
            RecordedEvent::TransitionEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": direction_name(e.direction),
                    "cat": "Transition",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.node.index(),
                    "args": {
                        "token": e.token.get(),
                        "outcome": match e.outcome {
                            RunOutcome::Finished => "finished",
                            RunOutcome::Cancelled => "cancelled",
                        },
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn us(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1000.0
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Show => "Show",
        Direction::Hide => "Hide",
    }
}

fn kind_name(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Stable => "stable",
        NodeKind::Passthrough => "passthrough",
    }
}
