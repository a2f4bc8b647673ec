// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clock-tree data model and frequency propagation for SoC clock
//! configuration.
//!
//! `clocktree_core` models a chip's clock generation tree (oscillator and
//! RTC sources, primary PLLs, secondary PLLs, and cascades of dividers
//! feeding named leaf clocks) and keeps every downstream frequency
//! consistent as multipliers and dividers change. It is `no_std` compatible
//! (with `alloc`) and stores nodes in an arena addressed by small index
//! handles.
//!
//! # Architecture
//!
//! ```text
//!   Topology + PresetTable (board profile)
//!       │
//!       ▼
//!   ClockTree::new() ──► Registry (arena, name index, pre-order)
//!       │
//!       ▼
//!   set_multiplier / set_divider / apply_preset / restore
//!       │  validate ─► mutate ─► recompute
//!       ▼
//!   Vec<ChangedNode> ──► ChangeSink::apply()
//!       │
//!       ▼
//!   export_frequencies() (changed since last export)
//! ```
//!
//! **[`tree`]**: [`ClockTree`](tree::ClockTree), the node
//! [`Registry`](tree::Registry), and the propagation engine. Frequencies are
//! computed as `parent * multiplier / divider` in parent-before-child order.
//!
//! **[`topology`]**: Static node tables supplied by a board profile.
//!
//! **[`preset`]**: Named bundles of settings applied atomically, and
//! restoring saved configurations.
//!
//! **[`validate`]**: Range and precision checks run before any mutation.
//!
//! **[`divider`]**: Exact eight-place fixed-point [`Divider`](divider::Divider).
//!
//! **[`dirty`]**: The `understory_dirty` channel behind export tracking.
//!
//! **[`export`]**: Per-node frequency export with changed flags.
//!
//! **[`sink`]**: The [`ChangeSink`](sink::ChangeSink) trait for consumers
//! of change lists.
//!
//! **[`profile`]**: Shipped board profiles (CV184x).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! edit instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates the per-pass
//!   node change event.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod dirty;
pub mod divider;
pub mod error;
pub mod export;
pub mod preset;
pub mod profile;
pub mod sink;
pub mod topology;
pub mod trace;
pub mod tree;
pub mod validate;
