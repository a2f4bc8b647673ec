// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity and kind.

use core::fmt;

/// A handle to a node in a [`Registry`](super::Registry).
///
/// Nodes are created once from the topology table and never removed, so an
/// id stays valid for the lifetime of the tree that issued it. Ids from a
/// different tree are caught by bounds checks and reported as
/// [`UnknownNode`](crate::error::ConfigError::UnknownNode).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node does to its parent's frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Oscillator or RTC with a fixed frequency and no parent.
    Source,
    /// Primary PLL: integer multiplier, divider fixed at 1.
    Pll,
    /// Secondary PLL: integer multiplier and an eight-place real divider.
    SubPll,
    /// Output clock: integer divider, optionally a small multiplier.
    Leaf,
}

impl NodeKind {
    /// Returns `true` if nodes of this kind have a user-settable divider.
    #[inline]
    #[must_use]
    pub const fn has_divider(self) -> bool {
        matches!(self, Self::SubPll | Self::Leaf)
    }
}
