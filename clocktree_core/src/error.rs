// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for tree construction and configuration edits.
//!
//! Construction problems ([`TopologyError`]) are detected once, when a
//! [`ClockTree`](crate::tree::ClockTree) is built from a
//! [`Topology`](crate::topology::Topology). Runtime edits fail with
//! [`ConfigError`] and leave the tree exactly as it was before the call.

use alloc::string::String;
use core::fmt;

/// The configurable field an edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// The integer multiplier of a PLL, sub-PLL, or scaling leaf.
    Multiplier,
    /// The divider of a sub-PLL or leaf.
    Divider,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Multiplier => "multiplier",
            Self::Divider => "divider",
        })
    }
}

/// A failed configuration edit, preset application, or lookup.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A node name or id does not exist in the tree.
    #[error("unknown clock node `{0}`")]
    UnknownNode(String),
    /// A value failed range or precision validation.
    #[error("invalid {field} {value} for clock node `{node}`")]
    InvalidConfig {
        /// Name of the node the edit targeted.
        node: String,
        /// Field the edit targeted.
        field: Field,
        /// The rejected value.
        value: f64,
    },
    /// No preset with this name or alias is registered.
    #[error("unknown preset `{0}`")]
    PresetNotFound(String),
}

/// A malformed topology table.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TopologyError {
    /// The table has no nodes.
    #[error("topology has no nodes")]
    Empty,
    /// Two nodes share a name.
    #[error("duplicate clock node name `{0}`")]
    DuplicateName(String),
    /// A node names a parent that is not in the table.
    #[error("clock node `{node}` names unknown parent `{parent}`")]
    UnknownParent {
        /// The node whose parent is missing.
        node: String,
        /// The parent name it referenced.
        parent: String,
    },
    /// A source node names a parent.
    #[error("source clock `{0}` must not have a parent")]
    SourceWithParent(String),
    /// A non-source node has no parent.
    #[error("clock node `{0}` has no parent")]
    MissingParent(String),
    /// A node lists itself as its parent.
    #[error("clock node `{0}` is its own parent")]
    ParentIsSelf(String),
    /// A source frequency is not a positive finite number.
    #[error("source clock `{node}` has invalid frequency {frequency} MHz")]
    InvalidSourceFrequency {
        /// The source node.
        node: String,
        /// The rejected frequency.
        frequency: f64,
    },
    /// A default multiplier or divider fails validation.
    #[error("invalid default: {0}")]
    InvalidDefault(ConfigError),
    /// The parent chain of a node never reaches a source.
    #[error("clock node `{0}` is part of a parent cycle")]
    Cycle(String),
}
