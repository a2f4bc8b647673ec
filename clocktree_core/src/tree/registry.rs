// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage, name index, and precomputed adjacency.

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::HashMap;

use super::id::{NodeId, NodeKind};
use super::node::ClockNode;
use crate::divider::Divider;
use crate::error::{ConfigError, Field, TopologyError};
use crate::topology::{NodeSpec, Topology};
use crate::validate;

/// Owns every [`ClockNode`] of one tree and answers lookups.
///
/// Nodes live in an arena indexed by [`NodeId`]. Everything derived from the
/// parent links is computed once in [`build`](Self::build): a name index,
/// contiguous per-node child lists, and a depth-first pre-order of the whole
/// forest in which every subtree occupies a contiguous range.
#[derive(Clone, Debug)]
pub struct Registry {
    pub(crate) nodes: Vec<ClockNode>,
    by_name: HashMap<String, NodeId>,
    // Children of slot `i` are `child_list[child_start[i]..child_start[i + 1]]`.
    child_start: Vec<u32>,
    child_list: Vec<NodeId>,
    roots: Vec<NodeId>,
    pub(crate) order: Vec<NodeId>,
    order_pos: Vec<u32>,
    subtree_len: Vec<u32>,
    // Own flag and every ancestor's flag set.
    pub(crate) live: Vec<bool>,
}

impl Registry {
    /// Builds a registry from a topology table and computes every frequency.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if the table is empty, names collide, a
    /// parent link is missing or dangling, a source is malformed, a default
    /// fails validation, or the parent links form a cycle.
    pub fn build(topology: &Topology) -> Result<Self, TopologyError> {
        if topology.is_empty() {
            return Err(TopologyError::Empty);
        }

        let mut by_name = HashMap::with_capacity(topology.len());
        for (slot, spec) in topology.nodes.iter().enumerate() {
            if by_name.insert(spec.name.clone(), id_for(slot)).is_some() {
                return Err(TopologyError::DuplicateName(spec.name.clone()));
            }
        }

        let mut nodes = Vec::with_capacity(topology.len());
        for (slot, spec) in topology.nodes.iter().enumerate() {
            let parent = resolve_parent(spec, &by_name)?;
            nodes.push(node_from_spec(id_for(slot), spec, parent)?);
        }

        let mut registry = Self {
            by_name,
            child_start: Vec::new(),
            child_list: Vec::new(),
            roots: Vec::new(),
            order: Vec::with_capacity(nodes.len()),
            order_pos: vec![u32::MAX; nodes.len()],
            subtree_len: vec![0; nodes.len()],
            live: vec![false; nodes.len()],
            nodes,
        };
        registry.build_adjacency();
        registry.rebuild_traversal_order();

        if let Some(stray) = registry
            .nodes
            .iter()
            .find(|n| registry.order_pos[n.id.slot()] == u32::MAX)
        {
            return Err(TopologyError::Cycle(stray.name.clone()));
        }

        registry.refresh_live(0..registry.order.len());
        for pos in 0..registry.order.len() {
            let id = registry.order[pos];
            let parent_frequency = registry.parent_frequency(id);
            let node = &mut registry.nodes[id.slot()];
            node.frequency = node.output_for(parent_frequency);
        }
        Ok(registry)
    }

    /// Returns the node with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] if this registry did not issue `id`.
    pub fn get(&self, id: NodeId) -> Result<&ClockNode, ConfigError> {
        self.nodes
            .get(id.slot())
            .ok_or_else(|| ConfigError::UnknownNode(id.to_string()))
    }

    /// Returns the id of the node called `name`, if any.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Returns the id of the node called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] if no node has that name.
    pub fn lookup(&self, name: &str) -> Result<NodeId, ConfigError> {
        self.get_by_name(name)
            .ok_or_else(|| ConfigError::UnknownNode(name.to_string()))
    }

    /// Returns the direct children of `id`, in topology-table order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] if this registry did not issue `id`.
    pub fn children_of(&self, id: NodeId) -> Result<&[NodeId], ConfigError> {
        self.get(id)?;
        let start = self.child_start[id.slot()] as usize;
        let end = self.child_start[id.slot() + 1] as usize;
        Ok(&self.child_list[start..end])
    }

    /// Returns `id` followed by all of its descendants, in pre-order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] if this registry did not issue `id`.
    pub fn subtree(&self, id: NodeId) -> Result<&[NodeId], ConfigError> {
        self.get(id)?;
        Ok(&self.order[self.subtree_range(id)])
    }

    /// Returns `true` if `id` and every ancestor of `id` are enabled.
    ///
    /// A node that is not live still carries a computed frequency; consumers
    /// should present it as stale. Ids this registry did not issue are never
    /// live.
    #[must_use]
    pub fn is_live(&self, id: NodeId) -> bool {
        self.live.get(id.slot()).copied().unwrap_or(false)
    }

    /// Returns the source nodes, in topology-table order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns every node in depth-first pre-order: each root followed by
    /// its subtree, parents always before their children.
    #[must_use]
    pub fn traversal_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Returns all nodes, indexed by [`NodeId::index`].
    #[must_use]
    pub fn nodes(&self) -> &[ClockNode] {
        &self.nodes
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the registry holds no nodes. Never true for a
    /// registry produced by [`build`](Self::build).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -- Crate-internal helpers --

    /// Positions in [`order`](Self::order) covered by the subtree of `id`.
    pub(crate) fn subtree_range(&self, id: NodeId) -> Range<usize> {
        let start = self.order_pos[id.slot()] as usize;
        start..start + self.subtree_len[id.slot()] as usize
    }

    pub(crate) fn parent_frequency(&self, id: NodeId) -> f64 {
        self.nodes[id.slot()]
            .parent
            .map_or(0.0, |p| self.nodes[p.slot()].frequency)
    }

    /// Recomputes liveness for the given traversal positions and returns the
    /// ids whose liveness flipped. The range must start at a subtree root or
    /// be a whole subtree, so parents are refreshed before children.
    pub(crate) fn refresh_live(&mut self, range: Range<usize>) -> Vec<NodeId> {
        let mut flipped = Vec::new();
        for pos in range {
            let id = self.order[pos];
            let node = &self.nodes[id.slot()];
            let parent_live = node.parent.is_none_or(|p| self.live[p.slot()]);
            let live = node.enabled && parent_live;
            if self.live[id.slot()] != live {
                self.live[id.slot()] = live;
                flipped.push(id);
            }
        }
        flipped
    }

    fn build_adjacency(&mut self) {
        let n = self.nodes.len();
        let mut counts = vec![0_u32; n + 1];
        for node in &self.nodes {
            match node.parent {
                Some(p) => counts[p.slot() + 1] += 1,
                None => self.roots.push(node.id),
            }
        }
        for i in 0..n {
            counts[i + 1] += counts[i];
        }
        let mut cursor = counts.clone();
        self.child_list = vec![NodeId(0); counts[n] as usize];
        for node in &self.nodes {
            if let Some(p) = node.parent {
                let at = &mut cursor[p.slot()];
                self.child_list[*at as usize] = node.id;
                *at += 1;
            }
        }
        self.child_start = counts;
    }

    /// Rebuilds the depth-first pre-order traversal from the roots.
    ///
    /// Nodes on a parent cycle are unreachable from any root and are left
    /// without a position.
    fn rebuild_traversal_order(&mut self) {
        self.order.clear();
        for i in 0..self.roots.len() {
            self.dfs_collect(self.roots[i]);
        }
    }

    fn dfs_collect(&mut self, id: NodeId) {
        let start = self.order.len();
        self.order_pos[id.slot()] = pos_u32(start);
        self.order.push(id);
        let first = self.child_start[id.slot()] as usize;
        let last = self.child_start[id.slot() + 1] as usize;
        for i in first..last {
            self.dfs_collect(self.child_list[i]);
        }
        self.subtree_len[id.slot()] = pos_u32(self.order.len() - start);
    }
}

fn resolve_parent(
    spec: &NodeSpec,
    by_name: &HashMap<String, NodeId>,
) -> Result<Option<NodeId>, TopologyError> {
    match (spec.kind, spec.parent.as_deref()) {
        (NodeKind::Source, Some(_)) => Err(TopologyError::SourceWithParent(spec.name.clone())),
        (NodeKind::Source, None) => Ok(None),
        (_, None) => Err(TopologyError::MissingParent(spec.name.clone())),
        (_, Some(parent)) if parent == spec.name => {
            Err(TopologyError::ParentIsSelf(spec.name.clone()))
        }
        (_, Some(parent)) => match by_name.get(parent) {
            Some(&id) => Ok(Some(id)),
            None => Err(TopologyError::UnknownParent {
                node: spec.name.clone(),
                parent: parent.to_string(),
            }),
        },
    }
}

fn node_from_spec(
    id: NodeId,
    spec: &NodeSpec,
    parent: Option<NodeId>,
) -> Result<ClockNode, TopologyError> {
    let mut node = ClockNode {
        id,
        name: spec.name.clone(),
        kind: spec.kind,
        parent,
        multiplier: 1,
        divider: Divider::ONE,
        scales: spec.kind == NodeKind::Leaf && spec.scales,
        enabled: spec.enabled,
        frequency: 0.0,
        default_multiplier: 1,
        default_divider: Divider::ONE,
    };

    if spec.kind == NodeKind::Source {
        if !spec.frequency.is_finite() || spec.frequency <= 0.0 {
            return Err(TopologyError::InvalidSourceFrequency {
                node: spec.name.clone(),
                frequency: spec.frequency,
            });
        }
        node.frequency = spec.frequency;
        return Ok(node);
    }

    if node.has_multiplier() {
        node.multiplier =
            validate::check_multiplier(&node, spec.multiplier).map_err(TopologyError::InvalidDefault)?;
    } else if spec.multiplier != 1 {
        return Err(fixed_field(spec, Field::Multiplier, f64::from(spec.multiplier)));
    }

    if spec.kind.has_divider() {
        node.divider =
            validate::check_divider(&node, spec.divider).map_err(TopologyError::InvalidDefault)?;
    } else if spec.divider != Divider::ONE {
        return Err(fixed_field(spec, Field::Divider, spec.divider.to_f64()));
    }

    node.default_multiplier = node.multiplier;
    node.default_divider = node.divider;
    Ok(node)
}

fn fixed_field(spec: &NodeSpec, field: Field, value: f64) -> TopologyError {
    TopologyError::InvalidDefault(ConfigError::InvalidConfig {
        node: spec.name.clone(),
        field,
        value,
    })
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "node count is bounded by NodeId's u32 index space"
)]
fn pos_u32(pos: usize) -> u32 {
    pos as u32
}

fn id_for(slot: usize) -> NodeId {
    NodeId(pos_u32(slot))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Topology {
        // Deliberately out of order: children listed before their parents.
        [
            NodeSpec::leaf("clk_uart", "clk_fab", 4),
            NodeSpec::pll("clk_fpll", "clk_osc", 40),
            NodeSpec::source("clk_osc", 25.0),
            NodeSpec::leaf("clk_fab", "clk_fpll", 10),
            NodeSpec::leaf("clk_spi", "clk_fpll", 4),
            NodeSpec::source("clk_rtc", 0.032_768),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn build_computes_frequencies_in_any_table_order() {
        let reg = Registry::build(&small()).unwrap();
        let freq = |name| reg.get(reg.lookup(name).unwrap()).unwrap().frequency();
        assert_eq!(freq("clk_osc"), 25.0);
        assert_eq!(freq("clk_fpll"), 1000.0);
        assert_eq!(freq("clk_fab"), 100.0);
        assert_eq!(freq("clk_uart"), 25.0);
        assert_eq!(freq("clk_spi"), 250.0);
        assert_eq!(freq("clk_rtc"), 0.032_768);
    }

    #[test]
    fn children_are_precomputed_in_table_order() {
        let reg = Registry::build(&small()).unwrap();
        let fpll = reg.lookup("clk_fpll").unwrap();
        let names: Vec<&str> = reg
            .children_of(fpll)
            .unwrap()
            .iter()
            .map(|&id| reg.get(id).unwrap().name())
            .collect();
        assert_eq!(names, ["clk_fab", "clk_spi"]);

        let uart = reg.lookup("clk_uart").unwrap();
        assert!(reg.children_of(uart).unwrap().is_empty());
    }

    #[test]
    fn traversal_is_pre_order_with_contiguous_subtrees() {
        let reg = Registry::build(&small()).unwrap();
        let names: Vec<&str> = reg
            .traversal_order()
            .iter()
            .map(|&id| reg.get(id).unwrap().name())
            .collect();
        assert_eq!(
            names,
            ["clk_osc", "clk_fpll", "clk_fab", "clk_uart", "clk_spi", "clk_rtc"]
        );

        let fpll = reg.lookup("clk_fpll").unwrap();
        assert_eq!(reg.subtree(fpll).unwrap().len(), 4);
        assert_eq!(reg.roots().len(), 2);
    }

    #[test]
    fn unknown_ids_and_names_are_reported() {
        let reg = Registry::build(&small()).unwrap();
        assert_eq!(
            reg.get(NodeId(99)),
            Err(ConfigError::UnknownNode(String::from("#99")))
        );
        assert_eq!(
            reg.lookup("clk_nope"),
            Err(ConfigError::UnknownNode(String::from("clk_nope")))
        );
        assert_eq!(reg.get_by_name("clk_nope"), None);
        assert!(!reg.is_live(NodeId(99)));
    }

    #[test]
    fn empty_and_duplicate_tables_are_rejected() {
        assert_eq!(
            Registry::build(&Topology::new()).unwrap_err(),
            TopologyError::Empty
        );
        let mut t = small();
        t.push(NodeSpec::leaf("clk_spi", "clk_fpll", 2));
        assert_eq!(
            Registry::build(&t).unwrap_err(),
            TopologyError::DuplicateName(String::from("clk_spi"))
        );
    }

    #[test]
    fn parent_links_are_checked() {
        let mut t = small();
        t.push(NodeSpec::leaf("clk_x", "clk_missing", 2));
        assert!(matches!(
            Registry::build(&t),
            Err(TopologyError::UnknownParent { .. })
        ));

        let mut t = small();
        t.push(NodeSpec::leaf("clk_x", "clk_x", 2));
        assert_eq!(
            Registry::build(&t).unwrap_err(),
            TopologyError::ParentIsSelf(String::from("clk_x"))
        );

        let mut t = small();
        let mut orphan = NodeSpec::leaf("clk_x", "clk_osc", 2);
        orphan.parent = None;
        t.push(orphan);
        assert_eq!(
            Registry::build(&t).unwrap_err(),
            TopologyError::MissingParent(String::from("clk_x"))
        );

        let mut t = small();
        let mut src = NodeSpec::source("clk_y", 10.0);
        src.parent = Some(String::from("clk_osc"));
        t.push(src);
        assert_eq!(
            Registry::build(&t).unwrap_err(),
            TopologyError::SourceWithParent(String::from("clk_y"))
        );
    }

    #[test]
    fn cycles_are_detected_at_construction() {
        let mut t = small();
        t.push(NodeSpec::leaf("clk_a", "clk_b", 2));
        t.push(NodeSpec::leaf("clk_b", "clk_a", 2));
        assert_eq!(
            Registry::build(&t).unwrap_err(),
            TopologyError::Cycle(String::from("clk_a"))
        );
    }

    #[test]
    fn invalid_defaults_are_rejected() {
        let mut t = small();
        t.push(NodeSpec::leaf("clk_x", "clk_fpll", 0));
        assert!(matches!(
            Registry::build(&t),
            Err(TopologyError::InvalidDefault(ConfigError::InvalidConfig {
                field: Field::Divider,
                ..
            }))
        ));

        let mut t = small();
        t.push(NodeSpec::pll("clk_x", "clk_osc", 101));
        assert!(matches!(
            Registry::build(&t),
            Err(TopologyError::InvalidDefault(ConfigError::InvalidConfig {
                field: Field::Multiplier,
                ..
            }))
        ));

        let mut t = small();
        t.push(NodeSpec::source("clk_x", 0.0));
        assert!(matches!(
            Registry::build(&t),
            Err(TopologyError::InvalidSourceFrequency { .. })
        ));
    }

    #[test]
    fn disabled_ancestor_makes_descendants_not_live() {
        let mut t = small();
        t.nodes[3] = NodeSpec::leaf("clk_fab", "clk_fpll", 10).disabled();
        let reg = Registry::build(&t).unwrap();
        let fab = reg.lookup("clk_fab").unwrap();
        let uart = reg.lookup("clk_uart").unwrap();
        let spi = reg.lookup("clk_spi").unwrap();
        assert!(!reg.is_live(fab));
        assert!(!reg.is_live(uart));
        assert!(reg.get(uart).unwrap().enabled());
        assert!(reg.is_live(spi));
        // Frequencies are still computed for stale nodes.
        assert_eq!(reg.get(uart).unwrap().frequency(), 25.0);
    }
}
