// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics, saved configuration files, and frequency export for
//! `clocktree_core`.
//!
//! This crate holds the `std`-only collaborators of the engine:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event trace
//!   output.
//! - [`config`]: JSON save/load of a tree's configuration.
//! - [`export`]: integer-hertz `clock-frequency` lines for device-tree
//!   style board files.
//! - [`table::FrequencyTable`]: a [`ChangeSink`](clocktree_core::sink::ChangeSink)
//!   that keeps a name → MHz table current.

pub mod config;
pub mod export;
pub mod pretty;
pub mod table;
