// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node records and the value types the engine hands back to callers.

use alloc::string::String;

use super::id::{NodeId, NodeKind};
use crate::divider::Divider;

/// One clock in the tree.
///
/// Configuration (`multiplier`, `divider`, `enabled`) is changed only through
/// [`ClockTree`](super::ClockTree) operations; `frequency` is written only by
/// the propagation engine.
#[derive(Clone, Debug, PartialEq)]
pub struct ClockNode {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) multiplier: u32,
    pub(crate) divider: Divider,
    pub(crate) scales: bool,
    pub(crate) enabled: bool,
    pub(crate) frequency: f64,
    pub(crate) default_multiplier: u32,
    pub(crate) default_divider: Divider,
}

impl ClockNode {
    /// Returns the node's id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node's unique name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the node's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the parent, or `None` for a source.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the current multiplier (1 for sources and plain leaves).
    #[inline]
    #[must_use]
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Returns the current divider ([`Divider::ONE`] for sources and PLLs).
    #[inline]
    #[must_use]
    pub fn divider(&self) -> Divider {
        self.divider
    }

    /// Returns whether this node's own enable flag is set.
    ///
    /// A node can be enabled yet still stale when an ancestor is disabled;
    /// see [`Registry::is_live`](super::Registry::is_live).
    #[inline]
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the last computed output frequency in MHz.
    #[inline]
    #[must_use]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Returns `true` if the multiplier of this node may be edited.
    ///
    /// PLLs and sub-PLLs always accept multiplier edits; leaves only when
    /// the topology declared them as scaling leaves.
    #[inline]
    #[must_use]
    pub fn has_multiplier(&self) -> bool {
        match self.kind {
            NodeKind::Source => false,
            NodeKind::Pll | NodeKind::SubPll => true,
            NodeKind::Leaf => self.scales,
        }
    }

    /// Returns the multiplier the topology table documents for this node.
    #[inline]
    #[must_use]
    pub fn default_multiplier(&self) -> u32 {
        self.default_multiplier
    }

    /// Returns the divider the topology table documents for this node.
    #[inline]
    #[must_use]
    pub fn default_divider(&self) -> Divider {
        self.default_divider
    }

    /// Applies the propagation formula to a parent frequency.
    ///
    /// `parent * multiplier / divider`, evaluated left to right in `f64`.
    /// Sources ignore the parent and return their fixed frequency.
    #[inline]
    #[must_use]
    pub fn output_for(&self, parent_frequency: f64) -> f64 {
        match self.kind {
            NodeKind::Source => self.frequency,
            _ => parent_frequency * f64::from(self.multiplier) / self.divider.to_f64(),
        }
    }
}

/// A node whose frequency changed during one settled recompute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChangedNode {
    /// The node that changed.
    pub id: NodeId,
    /// Frequency before the operation, in MHz.
    pub old_frequency: f64,
    /// Frequency after the operation, in MHz.
    pub new_frequency: f64,
    /// The node or one of its ancestors is disabled; consumers should show
    /// the value as stale rather than omit it.
    pub stale: bool,
}

/// The saved configuration of one node, as produced by
/// [`ClockTree::snapshot`](super::ClockTree::snapshot).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeConfig {
    /// Node name.
    pub name: String,
    /// Current multiplier.
    pub multiplier: u32,
    /// Current divider, exact.
    pub divider: Divider,
    /// Own enable flag.
    pub enabled: bool,
}
