// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clock tree data model and frequency propagation.
//!
//! A *node* is one clock in the tree. Each node has:
//!
//! - An identity ([`NodeId`]), a small index that stays valid for the life
//!   of the tree, and a unique name.
//! - A [`NodeKind`] deciding which fields are configurable and how the
//!   output is derived from the parent.
//! - **Configuration** set by the caller: multiplier, divider, and enable
//!   flag, changed only through [`ClockTree`] operations.
//! - A **computed frequency** in MHz, written only by propagation.
//!
//! Any node may be a parent, so bridge clocks such as `clk_fab_100m` feed
//! their own leaves directly; the tree has arbitrary depth.
//!
//! # Propagation
//!
//! Every mutating operation validates first, then mutates, then recomputes
//! in depth-first pre-order so each node is evaluated after its parent:
//!
//! - Single-node edits recompute the edited node's subtree only.
//! - Presets and restores write every setting, then run one full pass over
//!   all roots.
//!
//! Each operation returns the [`ChangedNode`]s whose frequency actually
//! changed, in recompute order.

mod engine;
mod evaluate;
mod id;
mod node;
mod registry;

pub use engine::ClockTree;
pub use id::{NodeId, NodeKind};
pub use node::{ChangedNode, ClockNode, NodeConfig};
pub use registry::Registry;
