// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static topology tables.
//!
//! A [`Topology`] is the chip-supplied description of which clocks exist,
//! what kind each one is, which node feeds it, and its documented default
//! multiplier and divider. It is plain data: the engine consumes it once in
//! [`ClockTree::new`](crate::tree::ClockTree::new) and never parses chip files
//! itself. Nodes may be listed in any order; parents are resolved by name
//! after every node has been seen.

use alloc::string::String;
use alloc::vec::Vec;

use crate::divider::Divider;
use crate::tree::NodeKind;

/// One row of a topology table.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSpec {
    /// Unique node name, e.g. `clk_fpll`.
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Name of the feeding node; `None` only for sources.
    pub parent: Option<String>,
    /// Default multiplier. Ignored for sources.
    pub multiplier: u32,
    /// Default divider. Must be [`Divider::ONE`] for sources and PLLs.
    pub divider: Divider,
    /// Leaf only: whether the multiplier may be edited.
    pub scales: bool,
    /// Initial enable flag.
    pub enabled: bool,
    /// Fixed output frequency in MHz; only meaningful for sources.
    pub frequency: f64,
}

impl NodeSpec {
    /// A fixed-frequency source (oscillator or RTC).
    pub fn source(name: impl Into<String>, frequency_mhz: f64) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Source,
            parent: None,
            multiplier: 1,
            divider: Divider::ONE,
            scales: false,
            enabled: true,
            frequency: frequency_mhz,
        }
    }

    /// A primary PLL multiplying its parent.
    pub fn pll(name: impl Into<String>, parent: impl Into<String>, multiplier: u32) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Pll,
            parent: Some(parent.into()),
            multiplier,
            divider: Divider::ONE,
            scales: false,
            enabled: true,
            frequency: 0.0,
        }
    }

    /// A secondary PLL with a multiplier and a real-valued divider.
    pub fn sub_pll(
        name: impl Into<String>,
        parent: impl Into<String>,
        multiplier: u32,
        divider: Divider,
    ) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::SubPll,
            parent: Some(parent.into()),
            multiplier,
            divider,
            scales: false,
            enabled: true,
            frequency: 0.0,
        }
    }

    /// An output clock dividing its parent by an integer.
    pub fn leaf(name: impl Into<String>, parent: impl Into<String>, divider: u32) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Leaf,
            parent: Some(parent.into()),
            multiplier: 1,
            divider: Divider::from_units(u64::from(divider) * crate::divider::DIVIDER_SCALE),
            scales: false,
            enabled: true,
            frequency: 0.0,
        }
    }

    /// Gives a leaf an editable multiplier with the given default.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self.scales = true;
        self
    }

    /// Starts the node disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A complete topology table for one chip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Topology {
    /// Node rows, in any order.
    pub nodes: Vec<NodeSpec>,
}

impl Topology {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn push(&mut self, spec: NodeSpec) -> &mut Self {
        self.nodes.push(spec);
        self
    }

    /// Appends a leaf for each name, all sharing `parent` and `divider`.
    pub fn leaves<'a>(
        &mut self,
        parent: &str,
        divider: u32,
        names: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        for name in names {
            self.nodes.push(NodeSpec::leaf(name, parent, divider));
        }
        self
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<NodeSpec> for Topology {
    fn from_iter<I: IntoIterator<Item = NodeSpec>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
