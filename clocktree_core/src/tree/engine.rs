// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`ClockTree`] owner type and its read-only query surface.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::NodeId;
use super::node::{ClockNode, NodeConfig};
use super::registry::Registry;
use crate::dirty;
use crate::error::{ConfigError, TopologyError};
use crate::preset::PresetTable;
use crate::topology::Topology;

/// A clock tree for one chip profile.
///
/// Owns the node [`Registry`], the board's [`PresetTable`], and the
/// changed-since-last-export state. Callers read through the accessors and
/// receive a change list from every mutating call; node state is never
/// mutated from outside.
///
/// Operations are synchronous and run to completion. A host that shares a
/// tree between threads should guard the whole tree with one lock.
#[derive(Debug)]
pub struct ClockTree {
    pub(crate) registry: Registry,
    pub(crate) presets: PresetTable,
    pub(crate) dirty: DirtyTracker<u32>,
}

impl ClockTree {
    /// Builds a tree from a topology table, computing every frequency.
    ///
    /// Every node starts out marked as changed for the first
    /// [`export_frequencies`](Self::export_frequencies) call.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if the table is malformed; see
    /// [`Registry::build`].
    pub fn new(topology: &Topology, presets: PresetTable) -> Result<Self, TopologyError> {
        let registry = Registry::build(topology)?;
        let mut dirty = DirtyTracker::with_cycle_handling(CycleHandling::Error);
        for node in registry.nodes() {
            dirty.mark(node.id().index(), dirty::EXPORT);
        }
        Ok(Self {
            registry,
            presets,
            dirty,
        })
    }

    /// Returns the node registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the presets this tree can apply.
    #[inline]
    #[must_use]
    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// Returns the node with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] if this tree did not issue `id`.
    #[inline]
    pub fn get(&self, id: NodeId) -> Result<&ClockNode, ConfigError> {
        self.registry.get(id)
    }

    /// Resolves a node name to its id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] if no node has that name.
    #[inline]
    pub fn lookup(&self, name: &str) -> Result<NodeId, ConfigError> {
        self.registry.lookup(name)
    }

    /// Returns the node called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] if no node has that name.
    pub fn node(&self, name: &str) -> Result<&ClockNode, ConfigError> {
        self.registry.get(self.registry.lookup(name)?)
    }

    /// Returns all nodes, indexed by [`NodeId::index`].
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[ClockNode] {
        self.registry.nodes()
    }

    /// Returns the source nodes.
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        self.registry.roots()
    }

    /// Returns every node in parent-before-child order.
    #[inline]
    #[must_use]
    pub fn traversal_order(&self) -> &[NodeId] {
        self.registry.traversal_order()
    }

    /// Returns the number of nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if the tree has no nodes; never true once built.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Returns the current frequency of `name` in MHz.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] if no node has that name.
    pub fn frequency_of(&self, name: &str) -> Result<f64, ConfigError> {
        Ok(self.node(name)?.frequency())
    }

    /// Returns the own enable flag of `name`.
    ///
    /// See [`Registry::is_live`] for whether the clock actually runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] if no node has that name.
    pub fn is_enabled(&self, name: &str) -> Result<bool, ConfigError> {
        Ok(self.node(name)?.enabled())
    }

    /// Returns `true` if `id` and all of its ancestors are enabled.
    #[inline]
    #[must_use]
    pub fn is_live(&self, id: NodeId) -> bool {
        self.registry.is_live(id)
    }

    /// Captures every node's configuration, in id order.
    ///
    /// Feeding the result to [`restore`](Self::restore) reproduces the
    /// current state exactly.
    #[must_use]
    pub fn snapshot(&self) -> Vec<NodeConfig> {
        self.registry
            .nodes()
            .iter()
            .map(|n| NodeConfig {
                name: n.name.clone(),
                multiplier: n.multiplier,
                divider: n.divider,
                enabled: n.enabled,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::divider::Divider;
    use crate::profile::cv184x;

    #[test]
    fn scenario_fpll_defaults_to_one_gigahertz() {
        let tree = cv184x::clock_tree().unwrap();
        assert_eq!(tree.frequency_of("clk_osc").unwrap(), 25.0);
        assert_eq!(tree.frequency_of("clk_rtc").unwrap(), 0.032_768);
        assert_eq!(tree.frequency_of("clk_fpll").unwrap(), 1000.0);
        assert_eq!(tree.node("clk_fpll").unwrap().multiplier(), 40);
    }

    #[test]
    fn queries_reject_unknown_names() {
        let tree = cv184x::clock_tree().unwrap();
        assert!(tree.frequency_of("clk_nope").is_err());
        assert!(tree.is_enabled("clk_nope").is_err());
        assert!(tree.node("").is_err());
    }

    #[test]
    fn snapshot_covers_every_node_in_id_order() {
        let tree = cv184x::clock_tree().unwrap();
        let snap = tree.snapshot();
        assert_eq!(snap.len(), tree.len());
        for (cfg, node) in snap.iter().zip(tree.nodes()) {
            assert_eq!(cfg.name, node.name());
        }
        let a0 = snap.iter().find(|c| c.name == "clk_a0pll").unwrap();
        assert_eq!(a0.divider, Divider::parse("7.32421875").unwrap());
    }

    #[test]
    fn bridge_leaves_are_ordinary_parents() {
        let tree = cv184x::clock_tree().unwrap();
        let fab = tree.lookup("clk_fab_100m").unwrap();
        let children = tree.registry().children_of(fab).unwrap();
        assert!(!children.is_empty(), "clk_fab_100m should feed leaves");
        for &child in children {
            assert_eq!(tree.get(child).unwrap().parent(), Some(fab));
        }
    }
}
