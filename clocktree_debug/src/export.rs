// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device-tree style frequency export.
//!
//! Renders [`ExportEntry`] values as integer-hertz `clock-frequency` lines,
//! one per node:
//!
//! ```text
//! clk_uart0: clock-frequency = <25000000>;
//! clk_a53: clock-frequency = <1000000000>; /* disabled */
//! ```
//!
//! Patching those values into a board file is left to the caller.

use std::io::{self, Write};

use clocktree_core::export::ExportEntry;
use clocktree_core::tree::ClockTree;

/// Which entries to write.
#[derive(Clone, Copy, Debug)]
pub enum Selection<'a> {
    /// Every node.
    All,
    /// Nodes whose frequency or liveness changed since the last export.
    Changed,
    /// Only the named nodes, in the order the tree lists them.
    Named(&'a [&'a str]),
}

impl Selection<'_> {
    fn includes(&self, entry: &ExportEntry<'_>) -> bool {
        match self {
            Self::All => true,
            Self::Changed => entry.changed,
            Self::Named(names) => names.contains(&entry.name),
        }
    }
}

/// Formats a `clock-frequency` property for `hz`.
#[must_use]
pub fn clock_frequency_property(hz: u64) -> String {
    format!("clock-frequency = <{hz}>;")
}

/// Writes the selected entries and returns how many lines were written.
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn write_entries(
    entries: &[ExportEntry<'_>],
    selection: Selection<'_>,
    writer: &mut dyn Write,
) -> io::Result<usize> {
    let mut written = 0;
    for entry in entries.iter().filter(|e| selection.includes(e)) {
        let note = if entry.live { "" } else { " /* disabled */" };
        writeln!(
            writer,
            "{}: {}{note}",
            entry.name,
            clock_frequency_property(entry.frequency_hz()),
        )?;
        written += 1;
    }
    Ok(written)
}

/// Exports from `tree`, clearing its changed flags.
///
/// # Errors
///
/// Returns any error from `writer`. The changed flags are cleared even if
/// writing fails.
pub fn export_tree(
    tree: &mut ClockTree,
    selection: Selection<'_>,
    writer: &mut dyn Write,
) -> io::Result<usize> {
    let entries = tree.export_frequencies();
    write_entries(&entries, selection, writer)
}
