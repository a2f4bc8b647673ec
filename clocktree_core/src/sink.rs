// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification contract.
//!
//! Consumers of frequency changes (a UI redraw layer, a configuration
//! exporter) implement [`ChangeSink`]. The engine does not call sinks
//! itself; every mutating operation returns its change list and the caller
//! hands it on:
//!
//! ```rust,ignore
//! let changes = tree.set_multiplier(id, 44)?;
//! sink.apply(&tree, &changes);
//! ```
//!
//! Sinks read current values from the tree as needed and must not assume
//! the list covers nodes whose frequency did not change.

use crate::tree::{ChangedNode, ClockTree};

/// Applies settled frequency changes to a downstream view.
pub trait ChangeSink {
    /// Applies `changes`, reading any other state it needs from `tree`.
    fn apply(&mut self, tree: &ClockTree, changes: &[ChangedNode]);
}
