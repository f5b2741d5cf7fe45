// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records, each prefixed with a one-byte tag.
//! [`decode`] reads them back as an iterator of [`RecordedEvent`].
//!
//! History snapshots are the only variable-length record: a `u32` count
//! followed by that many node indices.

use std::time::Duration;

use segue_core::node::{NodeId, NodeKind};
use segue_core::runner::{RunOutcome, RunToken, TransitionEvent};
use segue_core::trace::{
    LineageEvent, NavigationEvent, NavigationOp, TraceSink, TransitionStartEvent, VisibilityEvent,
};
use segue_core::transition::Direction;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_NAVIGATION: u8 = 1;
const TAG_HISTORY: u8 = 2;
const TAG_VISIBILITY: u8 = 3;
const TAG_TRANSITION_START: u8 = 4;
const TAG_TRANSITION_END: u8 = 5;
const TAG_LINEAGE: u8 = 6;
const TAG_ADVANCE: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_node(&mut self, id: NodeId) {
        self.write_u32(id.index());
    }

    fn write_option_node(&mut self, v: Option<NodeId>) {
        match v {
            Some(id) => {
                self.write_u8(1);
                self.write_node(id);
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
            }
        }
    }

    fn write_duration(&mut self, d: Duration) {
        self.write_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX));
    }

    fn write_direction(&mut self, d: Direction) {
        self.write_u8(match d {
            Direction::Show => 0,
            Direction::Hide => 1,
        });
    }

    fn write_op(&mut self, op: NavigationOp) {
        self.write_u8(match op {
            NavigationOp::Register => 0,
            NavigationOp::Deregister => 1,
            NavigationOp::NavigateTo => 2,
            NavigationOp::Back => 3,
            NavigationOp::Home => 4,
            NavigationOp::RegisterUntracked => 5,
            NavigationOp::DeregisterUntracked => 6,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_navigation(&mut self, e: &NavigationEvent) {
        self.write_u8(TAG_NAVIGATION);
        self.write_op(e.op);
        self.write_option_node(e.node);
        self.write_bool(e.succeeded);
    }

    fn on_history(&mut self, history: &[NodeId]) {
        self.write_u8(TAG_HISTORY);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "clamped to u32::MAX before the cast"
        )]
        let len = history.len().min(u32::MAX as usize) as u32;
        self.write_u32(len);
        for &id in history.iter().take(len as usize) {
            self.write_node(id);
        }
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.write_u8(TAG_VISIBILITY);
        self.write_node(e.node);
        self.write_bool(e.shown);
        self.write_bool(e.animated);
    }

    fn on_transition_start(&mut self, e: &TransitionStartEvent) {
        self.write_u8(TAG_TRANSITION_START);
        self.write_node(e.node);
        self.write_direction(e.direction);
        self.write_u64(e.token.get());
        self.write_duration(e.duration);
    }

    fn on_transition_end(&mut self, e: &TransitionEvent) {
        self.write_u8(TAG_TRANSITION_END);
        self.write_node(e.node);
        self.write_direction(e.direction);
        self.write_u64(e.token.get());
        self.write_u8(match e.outcome {
            RunOutcome::Finished => 0,
            RunOutcome::Cancelled => 1,
        });
    }

    fn on_lineage(&mut self, e: &LineageEvent) {
        self.write_u8(TAG_LINEAGE);
        self.write_node(e.node);
        self.write_u8(match e.kind {
            NodeKind::Stable => 0,
            NodeKind::Passthrough => 1,
        });
        self.write_option_node(e.parent);
        self.write_option_node(e.passthrough);
        self.write_u32(e.depth);
    }

    fn on_advance(&mut self, dt: Duration) {
        self.write_u8(TAG_ADVANCE);
        self.write_duration(dt);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`NavigationEvent`].
    Navigation(NavigationEvent),
    /// A history snapshot, bottom to top.
    History(Vec<NodeId>),
    /// A [`VisibilityEvent`].
    Visibility(VisibilityEvent),
    /// A [`TransitionStartEvent`].
    TransitionStart(TransitionStartEvent),
    /// A [`TransitionEvent`].
    TransitionEnd(TransitionEvent),
    /// A [`LineageEvent`].
    Lineage(LineageEvent),
    /// A frame advance.
    Advance(Duration),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        let v = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_node(&mut self) -> Option<NodeId> {
        self.read_u32().map(NodeId::from_index)
    }

    fn read_option_node(&mut self) -> Option<Option<NodeId>> {
        let present = self.read_u8()?;
        let id = self.read_node()?;
        Some((present != 0).then_some(id))
    }

    fn read_duration(&mut self) -> Option<Duration> {
        self.read_u64().map(Duration::from_nanos)
    }

    fn read_direction(&mut self) -> Option<Direction> {
        Some(match self.read_u8()? {
            0 => Direction::Show,
            _ => Direction::Hide,
        })
    }

    fn read_op(&mut self) -> Option<NavigationOp> {
        Some(match self.read_u8()? {
            0 => NavigationOp::Register,
            1 => NavigationOp::Deregister,
            2 => NavigationOp::NavigateTo,
            3 => NavigationOp::Back,
            4 => NavigationOp::Home,
            5 => NavigationOp::RegisterUntracked,
            6 => NavigationOp::DeregisterUntracked,
            _ => return None,
        })
    }

    fn decode_navigation(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Navigation(NavigationEvent {
            op: self.read_op()?,
            node: self.read_option_node()?,
            succeeded: self.read_bool()?,
        }))
    }

    fn decode_history(&mut self) -> Option<RecordedEvent> {
        let len = self.read_u32()? as usize;
        if self.remaining() / 4 < len {
            return None;
        }
        let mut history = Vec::with_capacity(len);
        for _ in 0..len {
            history.push(self.read_node()?);
        }
        Some(RecordedEvent::History(history))
    }

    fn decode_visibility(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Visibility(VisibilityEvent {
            node: self.read_node()?,
            shown: self.read_bool()?,
            animated: self.read_bool()?,
        }))
    }

    fn decode_transition_start(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TransitionStart(TransitionStartEvent {
            node: self.read_node()?,
            direction: self.read_direction()?,
            token: RunToken::from_raw(self.read_u64()?),
            duration: self.read_duration()?,
        }))
    }

    fn decode_transition_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TransitionEnd(TransitionEvent {
            node: self.read_node()?,
            direction: self.read_direction()?,
            token: RunToken::from_raw(self.read_u64()?),
            outcome: match self.read_u8()? {
                0 => RunOutcome::Finished,
                _ => RunOutcome::Cancelled,
            },
        }))
    }

    fn decode_lineage(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Lineage(LineageEvent {
            node: self.read_node()?,
            kind: match self.read_u8()? {
                0 => NodeKind::Stable,
                _ => NodeKind::Passthrough,
            },
            parent: self.read_option_node()?,
            passthrough: self.read_option_node()?,
            depth: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_NAVIGATION => self.decode_navigation(),
            TAG_HISTORY => self.decode_history(),
            TAG_VISIBILITY => self.decode_visibility(),
            TAG_TRANSITION_START => self.decode_transition_start(),
            TAG_TRANSITION_END => self.decode_transition_end(),
            TAG_LINEAGE => self.decode_lineage(),
            TAG_ADVANCE => self.read_duration().map(RecordedEvent::Advance),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
