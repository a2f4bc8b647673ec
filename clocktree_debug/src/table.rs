// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An incrementally maintained name → frequency table.
//!
//! [`FrequencyTable`] is a minimal [`ChangeSink`]: seeded once from a tree,
//! it then applies each change list without rescanning the tree. It stands
//! in for a UI layer in tests and tools that only need current values.

use std::collections::BTreeMap;
use std::fmt;

use clocktree_core::sink::ChangeSink;
use clocktree_core::tree::{ChangedNode, ClockTree};

/// One row of a [`FrequencyTable`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Row {
    /// Frequency in MHz.
    pub mhz: f64,
    /// The node or an ancestor is disabled.
    pub stale: bool,
}

/// Name-sorted view of node frequencies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrequencyTable {
    rows: BTreeMap<String, Row>,
    updates: usize,
}

impl FrequencyTable {
    /// Seeds a table with every node's current frequency.
    #[must_use]
    pub fn from_tree(tree: &ClockTree) -> Self {
        let rows = tree
            .nodes()
            .iter()
            .map(|n| {
                let row = Row {
                    mhz: n.frequency(),
                    stale: !tree.is_live(n.id()),
                };
                (n.name().to_owned(), row)
            })
            .collect();
        Self { rows, updates: 0 }
    }

    /// Returns the row for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Row> {
        self.rows.get(name).copied()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns how many row updates have been applied since seeding.
    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Re-reads liveness for every row, e.g. after `set_enabled`.
    pub fn refresh_liveness(&mut self, tree: &ClockTree) {
        for node in tree.nodes() {
            if let Some(row) = self.rows.get_mut(node.name()) {
                row.stale = !tree.is_live(node.id());
            }
        }
    }
}

impl ChangeSink for FrequencyTable {
    fn apply(&mut self, tree: &ClockTree, changes: &[ChangedNode]) {
        for change in changes {
            let Ok(node) = tree.get(change.id) else {
                continue;
            };
            let row = Row {
                mhz: change.new_frequency,
                stale: change.stale,
            };
            self.rows.insert(node.name().to_owned(), row);
            self.updates += 1;
        }
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, row) in &self.rows {
            let stale = if row.stale { " (stale)" } else { "" };
            writeln!(f, "{name:<24} {:>14.6} MHz{stale}", row.mhz)?;
        }
        Ok(())
    }
}
