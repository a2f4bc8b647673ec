// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for configuration edits.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! engine calls as an operation proceeds. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates the per-node
//!   [`on_node_changes`](TraceSink::on_node_changes) event.

use crate::error::{ConfigError, Field};
use crate::preset::PresetMode;
use crate::tree::NodeId;
#[cfg(feature = "trace-rich")]
use crate::tree::ChangedNode;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a single-node edit has been validated and applied.
#[derive(Clone, Copy, Debug)]
pub struct EditEvent<'a> {
    /// Edited node.
    pub node: NodeId,
    /// Name of the edited node.
    pub name: &'a str,
    /// Edited field.
    pub field: Field,
    /// Previous value.
    pub old: f64,
    /// New value.
    pub new: f64,
}

/// Emitted when a node's own enable flag is written.
#[derive(Clone, Copy, Debug)]
pub struct EnableEvent<'a> {
    /// Edited node.
    pub node: NodeId,
    /// Name of the edited node.
    pub name: &'a str,
    /// The new flag.
    pub enabled: bool,
    /// Number of nodes whose liveness flipped as a result.
    pub flipped: usize,
}

/// Emitted when a preset has been validated and its overrides applied.
#[derive(Clone, Copy, Debug)]
pub struct PresetEvent<'a> {
    /// Canonical preset name.
    pub preset: &'a str,
    /// Whether the preset reset the tree before patching it.
    pub mode: PresetMode,
    /// Number of node settings the preset wrote.
    pub writes: usize,
}

/// Where a recompute pass started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecomputeScope {
    /// The subtree under one edited node.
    Subtree(NodeId),
    /// Every root, in traversal order.
    Full,
}

/// Emitted after a recompute pass settles.
#[derive(Clone, Copy, Debug)]
pub struct RecomputeEvent {
    /// Where the pass started.
    pub scope: RecomputeScope,
    /// Number of nodes recomputed.
    pub visited: usize,
    /// Number of nodes whose frequency changed.
    pub changed: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a single-node edit is applied.
    fn on_edit(&mut self, e: &EditEvent<'_>) {
        _ = e;
    }

    /// Called after a node is enabled or disabled.
    fn on_enable(&mut self, e: &EnableEvent<'_>) {
        _ = e;
    }

    /// Called when an operation is rejected; the tree is unchanged.
    fn on_rejected(&mut self, error: &ConfigError) {
        _ = error;
    }

    /// Called after a preset's overrides are applied, before recompute.
    fn on_preset(&mut self, e: &PresetEvent<'_>) {
        _ = e;
    }

    /// Called after each recompute pass.
    fn on_recompute(&mut self, e: &RecomputeEvent) {
        _ = e;
    }

    /// Called with the full change list of a pass (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_node_changes(&mut self, changes: &[ChangedNode]) {
        _ = changes;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`EditEvent`].
    #[inline]
    pub fn edit(&mut self, e: &EditEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_edit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EnableEvent`].
    #[inline]
    pub fn enable(&mut self, e: &EnableEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_enable(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Reports a rejected operation.
    #[inline]
    pub fn rejected(&mut self, error: &ConfigError) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_rejected(error);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = error;
        }
    }

    /// Emits a [`PresetEvent`].
    #[inline]
    pub fn preset(&mut self, e: &PresetEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_preset(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RecomputeEvent`].
    #[inline]
    pub fn recompute(&mut self, e: &RecomputeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_recompute(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits the change list of a pass (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_changes(&mut self, changes: &[ChangedNode]) {
        if let Some(s) = &mut self.sink {
            s.on_node_changes(changes);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_edit() -> EditEvent<'static> {
        EditEvent {
            node: NodeId(3),
            name: "clk_fpll",
            field: Field::Multiplier,
            old: 40.0,
            new: 44.0,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_edit(&sample_edit());
        sink.on_rejected(&ConfigError::PresetNotFound("turbo".into()));
        sink.on_recompute(&RecomputeEvent {
            scope: RecomputeScope::Full,
            visited: 0,
            changed: 0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.edit(&sample_edit());
        tracer.preset(&PresetEvent {
            preset: "default",
            mode: PresetMode::Reset,
            writes: 0,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            edits: Vec<u32>,
            passes: usize,
        }
        impl TraceSink for RecordingSink {
            fn on_edit(&mut self, e: &EditEvent<'_>) {
                self.edits.push(e.node.index());
            }
            fn on_recompute(&mut self, _e: &RecomputeEvent) {
                self.passes += 1;
            }
        }

        let mut sink = RecordingSink {
            edits: Vec::new(),
            passes: 0,
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.edit(&sample_edit());
        tracer.recompute(&RecomputeEvent {
            scope: RecomputeScope::Subtree(NodeId(3)),
            visited: 4,
            changed: 4,
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.edits, &[3]);
        assert_eq!(sink.passes, 1);
    }
}
