// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The engine records which nodes changed since the last export using
//! [`understory_dirty`]. Propagation itself is not dirty-driven: every
//! mutating call recomputes its subtree eagerly and returns the change list.
//! The tracker only remembers, across calls, which nodes a downstream
//! exporter has not seen yet.
//!
//! # Propagation semantics
//!
//! [`EXPORT`] is local-only. The change list of each operation already
//! contains every affected descendant, so each changed node is marked
//! individually with the default policy and no dependency edges are needed.
//!
//! # Consumption
//!
//! [`ClockTree::export_frequencies`](crate::tree::ClockTree::export_frequencies)
//! drains the channel and reports the drained nodes as changed.

use understory_dirty::Channel;

/// Frequency or enable state changed since the last export.
pub const EXPORT: Channel = Channel::new(0);
