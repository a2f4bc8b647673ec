// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use clocktree_core::error::ConfigError;
use clocktree_core::preset::PresetMode;
use clocktree_core::trace::{
    EditEvent, EnableEvent, PresetEvent, RecomputeEvent, RecomputeScope, TraceSink,
};
use clocktree_core::tree::ChangedNode;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    verbose: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }

    /// Also prints one line per changed node after each recompute.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn mode_name(mode: PresetMode) -> &'static str {
    match mode {
        PresetMode::Reset => "reset",
        PresetMode::Patch => "patch",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_edit(&mut self, e: &EditEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[edit] {} {} {} -> {}",
            e.name, e.field, e.old, e.new,
        );
    }

    fn on_enable(&mut self, e: &EnableEvent<'_>) {
        let state = if e.enabled { "on" } else { "off" };
        let _ = writeln!(
            self.writer,
            "[enable] {} {state} flipped={}",
            e.name, e.flipped,
        );
    }

    fn on_rejected(&mut self, error: &ConfigError) {
        let _ = writeln!(self.writer, "[rejected] {error}");
    }

    fn on_preset(&mut self, e: &PresetEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[preset] {} mode={} writes={}",
            e.preset,
            mode_name(e.mode),
            e.writes,
        );
    }

    fn on_recompute(&mut self, e: &RecomputeEvent) {
        let scope = match e.scope {
            RecomputeScope::Subtree(id) => format!("subtree={id}"),
            RecomputeScope::Full => "full".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[recompute] {scope} visited={} changed={}",
            e.visited, e.changed,
        );
    }

    fn on_node_changes(&mut self, changes: &[ChangedNode]) {
        if !self.verbose {
            return;
        }
        for c in changes {
            let stale = if c.stale { " (stale)" } else { "" };
            let _ = writeln!(
                self.writer,
                "  {} {:.6} -> {:.6} MHz{stale}",
                c.id, c.old_frequency, c.new_frequency,
            );
        }
    }
}
