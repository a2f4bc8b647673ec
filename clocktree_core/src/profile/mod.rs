// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Board profiles: static topology and preset tables.
//!
//! A profile is plain data handed to [`ClockTree::new`](crate::tree::ClockTree::new).
//! Each supported chip gets its own submodule exposing `topology()`,
//! `presets()`, and a `clock_tree()` convenience constructor.

pub mod cv184x;
