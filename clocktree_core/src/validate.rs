// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range and precision checks for multiplier and divider edits.
//!
//! Every edit path (single-node setters, presets, restoring a saved
//! configuration, and the topology defaults themselves) runs through these
//! checks before any node is touched.
//!
//! | Field      | Kind             | Accepted values                      |
//! |------------|------------------|--------------------------------------|
//! | multiplier | PLL, sub-PLL     | integer in `[1, 100]`                |
//! | multiplier | scaling leaf     | integer in `[1, 100]`                |
//! | divider    | sub-PLL          | real in `(0, 256]`, eight places max |
//! | divider    | leaf             | integer in `[1, 1000]`               |
//!
//! Sources accept neither field, PLLs do not accept a divider, and plain
//! leaves do not accept a multiplier.

use alloc::string::ToString;

use crate::divider::{DIVIDER_SCALE, Divider};
use crate::error::{ConfigError, Field};
use crate::tree::{ClockNode, NodeKind};

/// Smallest accepted multiplier.
pub const MULTIPLIER_MIN: u32 = 1;

/// Largest accepted multiplier.
pub const MULTIPLIER_MAX: u32 = 100;

/// Largest accepted sub-PLL divider.
pub const SUB_PLL_DIVIDER_MAX: u64 = 256;

/// Largest accepted leaf divider.
pub const LEAF_DIVIDER_MAX: u64 = 1000;

const SUB_PLL_DIVIDER_LIMIT: Divider = Divider::from_units(SUB_PLL_DIVIDER_MAX * DIVIDER_SCALE);
const LEAF_DIVIDER_LIMIT: Divider = Divider::from_units(LEAF_DIVIDER_MAX * DIVIDER_SCALE);

/// Checks a multiplier edit for `node`.
pub fn check_multiplier(node: &ClockNode, value: u32) -> Result<u32, ConfigError> {
    if node.has_multiplier() && (MULTIPLIER_MIN..=MULTIPLIER_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(invalid(node, Field::Multiplier, f64::from(value)))
    }
}

/// Checks a divider edit given as an `f64`, snapping it to a [`Divider`].
pub fn check_divider_f64(node: &ClockNode, value: f64) -> Result<Divider, ConfigError> {
    match Divider::from_f64(value) {
        Some(divider) => check_divider(node, divider),
        None => Err(invalid(node, Field::Divider, value)),
    }
}

/// Checks an exact divider edit for `node`.
pub fn check_divider(node: &ClockNode, divider: Divider) -> Result<Divider, ConfigError> {
    let ok = match node.kind() {
        NodeKind::Source | NodeKind::Pll => false,
        NodeKind::SubPll => !divider.is_zero() && divider <= SUB_PLL_DIVIDER_LIMIT,
        NodeKind::Leaf => {
            divider.is_integer() && divider >= Divider::ONE && divider <= LEAF_DIVIDER_LIMIT
        }
    };
    if ok {
        Ok(divider)
    } else {
        Err(invalid(node, Field::Divider, divider.to_f64()))
    }
}

fn invalid(node: &ClockNode, field: Field, value: f64) -> ConfigError {
    ConfigError::InvalidConfig {
        node: node.name().to_string(),
        field,
        value,
    }
}
