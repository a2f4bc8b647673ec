// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-node edits and the recompute pass.
//!
//! Each edit follows the same three steps:
//!
//! 1. **Validate**: look up the node and range-check the value. On failure
//!    nothing has been touched.
//! 2. **Mutate**: write the one configuration field.
//! 3. **Recompute**: walk the edited node's subtree in pre-order, applying
//!    `parent * multiplier / divider` to every node and collecting those
//!    whose frequency changed.
//!
//! Ancestors never depend on a descendant, so starting at the edited node is
//! enough to restore consistency for the whole tree.

use alloc::vec::Vec;
use core::ops::Range;

use super::engine::ClockTree;
use super::id::NodeId;
use super::node::ChangedNode;
use crate::divider::Divider;
use crate::dirty;
use crate::error::{ConfigError, Field};
use crate::trace::{EditEvent, EnableEvent, RecomputeEvent, RecomputeScope, Tracer};
use crate::validate;

impl ClockTree {
    /// Sets the multiplier of a PLL, sub-PLL, or scaling leaf.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] for a foreign id and
    /// [`ConfigError::InvalidConfig`] if the value is outside `[1, 100]` or
    /// the node has no editable multiplier. The tree is unchanged on error.
    pub fn set_multiplier(
        &mut self,
        id: NodeId,
        value: u32,
    ) -> Result<Vec<ChangedNode>, ConfigError> {
        self.set_multiplier_traced(id, value, &mut Tracer::none())
    }

    /// Like [`set_multiplier`](Self::set_multiplier), reporting to `tracer`.
    pub fn set_multiplier_traced(
        &mut self,
        id: NodeId,
        value: u32,
        tracer: &mut Tracer<'_>,
    ) -> Result<Vec<ChangedNode>, ConfigError> {
        let value = self
            .registry
            .get(id)
            .and_then(|node| validate::check_multiplier(node, value))
            .inspect_err(|e| tracer.rejected(e))?;

        let node = &mut self.registry.nodes[id.slot()];
        let old = node.multiplier;
        node.multiplier = value;
        tracer.edit(&EditEvent {
            node: id,
            name: &node.name,
            field: Field::Multiplier,
            old: f64::from(old),
            new: f64::from(value),
        });
        Ok(self.recompute_subtree(id, tracer))
    }

    /// Sets the divider of a sub-PLL or leaf.
    ///
    /// The value is snapped to eight decimal places; anything that needs
    /// more precision is rejected rather than rounded.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] for a foreign id and
    /// [`ConfigError::InvalidConfig`] if the value is zero, out of range for
    /// the node's kind, too precise, or the node has no divider. The tree is
    /// unchanged on error.
    pub fn set_divider(&mut self, id: NodeId, value: f64) -> Result<Vec<ChangedNode>, ConfigError> {
        self.set_divider_traced(id, value, &mut Tracer::none())
    }

    /// Like [`set_divider`](Self::set_divider), reporting to `tracer`.
    pub fn set_divider_traced(
        &mut self,
        id: NodeId,
        value: f64,
        tracer: &mut Tracer<'_>,
    ) -> Result<Vec<ChangedNode>, ConfigError> {
        let divider = self
            .registry
            .get(id)
            .and_then(|node| validate::check_divider_f64(node, value))
            .inspect_err(|e| tracer.rejected(e))?;
        Ok(self.write_divider(id, divider, tracer))
    }

    /// Sets the divider of a sub-PLL or leaf from an exact value.
    ///
    /// # Errors
    ///
    /// As [`set_divider`](Self::set_divider).
    pub fn set_divider_exact(
        &mut self,
        id: NodeId,
        divider: Divider,
    ) -> Result<Vec<ChangedNode>, ConfigError> {
        self.set_divider_exact_traced(id, divider, &mut Tracer::none())
    }

    /// Like [`set_divider_exact`](Self::set_divider_exact), reporting to
    /// `tracer`.
    pub fn set_divider_exact_traced(
        &mut self,
        id: NodeId,
        divider: Divider,
        tracer: &mut Tracer<'_>,
    ) -> Result<Vec<ChangedNode>, ConfigError> {
        let divider = self
            .registry
            .get(id)
            .and_then(|node| validate::check_divider(node, divider))
            .inspect_err(|e| tracer.rejected(e))?;
        Ok(self.write_divider(id, divider, tracer))
    }

    /// Enables or disables a node.
    ///
    /// Frequencies are unaffected: a disabled subtree keeps computing so it
    /// is correct when re-enabled. Returns the ids whose liveness flipped,
    /// in pre-order; they are marked for the next export.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] for a foreign id.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<Vec<NodeId>, ConfigError> {
        self.set_enabled_traced(id, enabled, &mut Tracer::none())
    }

    /// Like [`set_enabled`](Self::set_enabled), reporting to `tracer`.
    pub fn set_enabled_traced(
        &mut self,
        id: NodeId,
        enabled: bool,
        tracer: &mut Tracer<'_>,
    ) -> Result<Vec<NodeId>, ConfigError> {
        self.registry.get(id).inspect_err(|e| tracer.rejected(e))?;

        self.registry.nodes[id.slot()].enabled = enabled;
        let flipped = self.registry.refresh_live(self.registry.subtree_range(id));
        for flip in &flipped {
            self.dirty.mark(flip.index(), dirty::EXPORT);
        }
        tracer.enable(&EnableEvent {
            node: id,
            name: &self.registry.nodes[id.slot()].name,
            enabled,
            flipped: flipped.len(),
        });
        Ok(flipped)
    }

    fn write_divider(
        &mut self,
        id: NodeId,
        divider: Divider,
        tracer: &mut Tracer<'_>,
    ) -> Vec<ChangedNode> {
        let node = &mut self.registry.nodes[id.slot()];
        let old = node.divider;
        node.divider = divider;
        tracer.edit(&EditEvent {
            node: id,
            name: &node.name,
            field: Field::Divider,
            old: old.to_f64(),
            new: divider.to_f64(),
        });
        self.recompute_subtree(id, tracer)
    }

    /// Recomputes `id` and every descendant, parent before child.
    pub(crate) fn recompute_subtree(
        &mut self,
        id: NodeId,
        tracer: &mut Tracer<'_>,
    ) -> Vec<ChangedNode> {
        let range = self.registry.subtree_range(id);
        self.recompute_range(range, RecomputeScope::Subtree(id), tracer)
    }

    /// Recomputes every node from every root.
    pub(crate) fn recompute_all(&mut self, tracer: &mut Tracer<'_>) -> Vec<ChangedNode> {
        let range = 0..self.registry.order.len();
        self.recompute_range(range, RecomputeScope::Full, tracer)
    }

    fn recompute_range(
        &mut self,
        range: Range<usize>,
        scope: RecomputeScope,
        tracer: &mut Tracer<'_>,
    ) -> Vec<ChangedNode> {
        let visited = range.len();
        let mut changes = Vec::new();
        for pos in range {
            let id = self.registry.order[pos];
            let parent_frequency = self.registry.parent_frequency(id);
            let stale = !self.registry.live[id.slot()];
            let node = &mut self.registry.nodes[id.slot()];
            let old = node.frequency;
            let new = node.output_for(parent_frequency);
            if new != old {
                node.frequency = new;
                self.dirty.mark(id.index(), dirty::EXPORT);
                changes.push(ChangedNode {
                    id,
                    old_frequency: old,
                    new_frequency: new,
                    stale,
                });
            }
        }

        tracer.recompute(&RecomputeEvent {
            scope,
            visited,
            changed: changes.len(),
        });
        #[cfg(feature = "trace-rich")]
        tracer.node_changes(&changes);
        changes
    }
}
