// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frequency export with changed-since-last-export tracking.
//!
//! Exporters (for example a device-tree writer) need the current frequency
//! of every node and to know which ones moved since they last looked.
//! Every recompute marks changed nodes on the [`EXPORT`](crate::dirty::EXPORT)
//! channel; [`ClockTree::export_frequencies`] drains it.

use alloc::vec;
use alloc::vec::Vec;

use crate::dirty;
use crate::tree::{ClockTree, NodeId};

/// One node's exported state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportEntry<'a> {
    /// Node id.
    pub id: NodeId,
    /// Node name.
    pub name: &'a str,
    /// Current frequency in MHz.
    pub frequency_mhz: f64,
    /// Whether the node and all its ancestors are enabled.
    pub live: bool,
    /// Frequency or liveness changed since the previous export.
    pub changed: bool,
}

impl ExportEntry<'_> {
    /// Returns the frequency rounded to whole hertz.
    #[must_use]
    pub fn frequency_hz(&self) -> u64 {
        mhz_to_hz(self.frequency_mhz)
    }
}

/// Converts MHz to whole hertz, rounding to nearest.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "clock frequencies are far below u64::MAX hertz"
)]
pub fn mhz_to_hz(mhz: f64) -> u64 {
    let hz = mhz * 1_000_000.0;
    if hz <= 0.0 { 0 } else { (hz + 0.5) as u64 }
}

impl ClockTree {
    /// Returns every node's frequency in id order and clears the changed
    /// flags.
    ///
    /// The first export after construction reports every node as changed.
    pub fn export_frequencies(&mut self) -> Vec<ExportEntry<'_>> {
        let mut changed = vec![false; self.registry.len()];
        let drained: Vec<u32> = self
            .dirty
            .drain(dirty::EXPORT)
            .deterministic()
            .run()
            .collect();
        for idx in drained {
            if let Some(flag) = changed.get_mut(idx as usize) {
                *flag = true;
            }
        }

        self.registry
            .nodes()
            .iter()
            .map(|n| ExportEntry {
                id: n.id(),
                name: n.name(),
                frequency_mhz: n.frequency(),
                live: self.registry.is_live(n.id()),
                changed: changed[n.id().index() as usize],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::cv184x;

    fn changed_names(tree: &mut ClockTree) -> Vec<alloc::string::String> {
        tree.export_frequencies()
            .into_iter()
            .filter(|e| e.changed)
            .map(|e| e.name.into())
            .collect()
    }

    #[test]
    fn first_export_reports_everything() {
        let mut tree = cv184x::clock_tree().unwrap();
        let len = tree.len();
        assert_eq!(changed_names(&mut tree).len(), len);
        assert!(changed_names(&mut tree).is_empty(), "flags clear on export");
    }

    #[test]
    fn export_tracks_edits_between_calls() {
        let mut tree = cv184x::clock_tree().unwrap();
        tree.export_frequencies();

        let tpu = tree.lookup("clk_tpu").unwrap();
        tree.set_divider(tpu, 2.0).unwrap();
        let uart = tree.lookup("clk_uart0").unwrap();
        tree.set_divider(uart, 40.0).unwrap();

        assert_eq!(changed_names(&mut tree), ["clk_tpu"]);
    }

    #[test]
    fn liveness_flips_are_exported() {
        let mut tree = cv184x::clock_tree().unwrap();
        tree.export_frequencies();

        let a53 = tree.lookup("clk_a53").unwrap();
        tree.set_enabled(a53, false).unwrap();

        let entries = tree.export_frequencies();
        let entry = entries.iter().find(|e| e.name == "clk_a53").unwrap();
        assert!(entry.changed);
        assert!(!entry.live);
        assert_eq!(entry.frequency_hz(), 1_000_000_000);
    }

    #[test]
    fn hertz_conversion_rounds() {
        assert_eq!(mhz_to_hz(25.0), 25_000_000);
        assert_eq!(mhz_to_hz(0.032_768), 32_768);
        assert_eq!(mhz_to_hz(1000.0 * 64.0 / 36.0), 1_777_777_778);
        assert_eq!(mhz_to_hz(-1.0), 0);
    }
}
