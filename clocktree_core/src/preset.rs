// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named presets and atomic bulk configuration.
//!
//! A [`Preset`] is board-profile data: a bundle of multiplier and divider
//! settings applied together. [`ClockTree::apply_preset`] and
//! [`ClockTree::restore`] share one policy:
//!
//! 1. Resolve and validate every setting. Any failure rejects the whole
//!    call before a single node is written.
//! 2. Write every setting without recomputing in between.
//! 3. Run exactly one full recompute pass from every root.
//!
//! A caller therefore never observes a state where half of a multi-node
//! change has been propagated.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::divider::Divider;
use crate::error::ConfigError;
use crate::trace::{PresetEvent, Tracer};
use crate::tree::{ChangedNode, ClockTree, NodeConfig, NodeId};
use crate::{dirty, validate};

/// How a preset treats settings it does not mention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresetMode {
    /// Reset every multiplier and divider to its topology default, then
    /// apply the overrides. Enable flags are left alone.
    Reset,
    /// Apply only the overrides; everything else keeps its current value.
    Patch,
}

/// One setting written by a preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Setting {
    /// Set the node's multiplier.
    Multiplier(u32),
    /// Set the node's divider.
    Divider(Divider),
}

/// A setting bound to a node name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Override {
    /// Target node name.
    pub node: String,
    /// Value to write.
    pub setting: Setting,
}

/// A named bundle of settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    /// Canonical name, e.g. `overclock`.
    pub name: String,
    /// Alternative names, e.g. `OD`.
    pub aliases: Vec<String>,
    /// Whether unmentioned settings are reset or kept.
    pub mode: PresetMode,
    /// Settings, applied in order; a later override of the same field wins.
    pub overrides: Vec<Override>,
}

impl Preset {
    /// Creates a preset with no aliases or overrides.
    pub fn new(name: impl Into<String>, mode: PresetMode) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            mode,
            overrides: Vec::new(),
        }
    }

    /// Adds an alternative name.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds a multiplier override.
    #[must_use]
    pub fn multiplier(mut self, node: impl Into<String>, value: u32) -> Self {
        self.overrides.push(Override {
            node: node.into(),
            setting: Setting::Multiplier(value),
        });
        self
    }

    /// Adds a divider override.
    #[must_use]
    pub fn divider(mut self, node: impl Into<String>, value: Divider) -> Self {
        self.overrides.push(Override {
            node: node.into(),
            setting: Setting::Divider(value),
        });
        self
    }

    /// Returns `true` if `name` is this preset's name or one of its aliases.
    #[must_use]
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }
}

/// The presets a board profile offers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresetTable {
    presets: Vec<Preset>,
}

impl PresetTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a preset. Earlier presets win on name clashes.
    pub fn push(&mut self, preset: Preset) -> &mut Self {
        self.presets.push(preset);
        self
    }

    /// Finds a preset by name or alias.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.answers_to(name))
    }

    /// Iterates over presets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    /// Returns the number of presets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Returns `true` if the table has no presets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl FromIterator<Preset> for PresetTable {
    fn from_iter<I: IntoIterator<Item = Preset>>(iter: I) -> Self {
        Self {
            presets: iter.into_iter().collect(),
        }
    }
}

/// A validated write, ready to apply.
#[derive(Clone, Copy, Debug)]
struct PendingWrite {
    id: NodeId,
    multiplier: u32,
    divider: Divider,
    enabled: Option<bool>,
}

impl ClockTree {
    /// Applies the preset called `name` (or with that alias) atomically.
    ///
    /// Returns every node whose frequency changed, in traversal order.
    /// Applying the same [`PresetMode::Reset`] preset twice yields an empty
    /// change list the second time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PresetNotFound`] for an unknown name, and
    /// [`ConfigError::UnknownNode`] or [`ConfigError::InvalidConfig`] if any
    /// override does not resolve or validate. No node is written on error.
    pub fn apply_preset(&mut self, name: &str) -> Result<Vec<ChangedNode>, ConfigError> {
        self.apply_preset_traced(name, &mut Tracer::none())
    }

    /// Like [`apply_preset`](Self::apply_preset), reporting to `tracer`.
    pub fn apply_preset_traced(
        &mut self,
        name: &str,
        tracer: &mut Tracer<'_>,
    ) -> Result<Vec<ChangedNode>, ConfigError> {
        let Some(preset) = self.presets.find(name) else {
            let err = ConfigError::PresetNotFound(name.to_string());
            tracer.rejected(&err);
            return Err(err);
        };
        let writes = self
            .plan_preset(preset)
            .inspect_err(|e| tracer.rejected(e))?;

        tracer.preset(&PresetEvent {
            preset: &preset.name,
            mode: preset.mode,
            writes: writes.len(),
        });
        Ok(self.commit(&writes, tracer))
    }

    /// Restores a saved configuration atomically.
    ///
    /// Nodes not named in `configs` keep their current settings. Fields a
    /// node kind does not expose (a source's multiplier, a PLL's divider)
    /// must carry their fixed value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNode`] or [`ConfigError::InvalidConfig`]
    /// if any entry does not resolve or validate. No node is written on
    /// error.
    pub fn restore(&mut self, configs: &[NodeConfig]) -> Result<Vec<ChangedNode>, ConfigError> {
        self.restore_traced(configs, &mut Tracer::none())
    }

    /// Like [`restore`](Self::restore), reporting to `tracer`.
    pub fn restore_traced(
        &mut self,
        configs: &[NodeConfig],
        tracer: &mut Tracer<'_>,
    ) -> Result<Vec<ChangedNode>, ConfigError> {
        let writes = self
            .plan_restore(configs)
            .inspect_err(|e| tracer.rejected(e))?;
        Ok(self.commit(&writes, tracer))
    }

    fn plan_preset(&self, preset: &Preset) -> Result<Vec<PendingWrite>, ConfigError> {
        let mut writes: Vec<PendingWrite> = Vec::new();
        if preset.mode == PresetMode::Reset {
            for &id in self.registry.traversal_order() {
                let node = self.registry.get(id)?;
                if node.has_multiplier() || node.kind().has_divider() {
                    writes.push(PendingWrite {
                        id,
                        multiplier: node.default_multiplier(),
                        divider: node.default_divider(),
                        enabled: None,
                    });
                }
            }
        }

        for o in &preset.overrides {
            let id = self.registry.lookup(&o.node)?;
            let node = self.registry.get(id)?;
            let slot = match writes.iter().position(|w| w.id == id) {
                Some(slot) => slot,
                None => {
                    writes.push(PendingWrite {
                        id,
                        multiplier: node.multiplier(),
                        divider: node.divider(),
                        enabled: None,
                    });
                    writes.len() - 1
                }
            };
            match o.setting {
                Setting::Multiplier(m) => {
                    writes[slot].multiplier = validate::check_multiplier(node, m)?;
                }
                Setting::Divider(d) => writes[slot].divider = validate::check_divider(node, d)?,
            }
        }
        Ok(writes)
    }

    fn plan_restore(&self, configs: &[NodeConfig]) -> Result<Vec<PendingWrite>, ConfigError> {
        configs
            .iter()
            .map(|cfg| {
                let id = self.registry.lookup(&cfg.name)?;
                let node = self.registry.get(id)?;
                let multiplier = if cfg.multiplier == node.multiplier() {
                    cfg.multiplier
                } else {
                    validate::check_multiplier(node, cfg.multiplier)?
                };
                let divider = if cfg.divider == node.divider() {
                    cfg.divider
                } else {
                    validate::check_divider(node, cfg.divider)?
                };
                Ok(PendingWrite {
                    id,
                    multiplier,
                    divider,
                    enabled: Some(cfg.enabled),
                })
            })
            .collect()
    }

    /// Writes every planned setting, then recomputes once.
    fn commit(&mut self, writes: &[PendingWrite], tracer: &mut Tracer<'_>) -> Vec<ChangedNode> {
        let mut touched_enable = false;
        for w in writes {
            let node = &mut self.registry.nodes[w.id.slot()];
            node.multiplier = w.multiplier;
            node.divider = w.divider;
            if let Some(enabled) = w.enabled {
                touched_enable |= node.enabled != enabled;
                node.enabled = enabled;
            }
        }
        if touched_enable {
            let all = 0..self.registry.order.len();
            for id in self.registry.refresh_live(all) {
                self.dirty.mark(id.index(), dirty::EXPORT);
            }
        }
        self.recompute_all(tracer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::cv184x;

    fn names<'a>(tree: &'a ClockTree, changes: &[ChangedNode]) -> Vec<&'a str> {
        changes
            .iter()
            .map(|c| tree.get(c.id).unwrap().name())
            .collect()
    }

    #[test]
    fn default_preset_is_idempotent() {
        let mut tree = cv184x::clock_tree().unwrap();
        let fpll = tree.lookup("clk_fpll").unwrap();
        tree.set_multiplier(fpll, 30).unwrap();

        let first = tree.apply_preset("default").unwrap();
        assert!(!first.is_empty(), "reset should undo the manual edit");
        let state = tree.snapshot();

        let second = tree.apply_preset("default").unwrap();
        assert!(second.is_empty(), "second reset should change nothing");
        assert_eq!(tree.snapshot(), state);
        assert_eq!(tree.frequency_of("clk_fpll").unwrap(), 1000.0);
    }

    #[test]
    fn overclock_touches_only_its_targets_and_descendants() {
        let mut tree = cv184x::clock_tree().unwrap();
        tree.apply_preset("default").unwrap();

        let changes = tree.apply_preset("overclock").unwrap();

        let mut allowed = Vec::new();
        for target in ["clk_appll", "clk_rvpll", "clk_tpu", "clk_tpu_gdma"] {
            let id = tree.lookup(target).unwrap();
            allowed.extend_from_slice(tree.registry().subtree(id).unwrap());
        }
        for c in &changes {
            assert!(
                allowed.contains(&c.id),
                "{} changed but is not an overclock target",
                tree.get(c.id).unwrap().name()
            );
        }
        assert_eq!(changes.len(), allowed.len(), "every target subtree changes");

        assert_eq!(tree.node("clk_appll").unwrap().multiplier(), 44);
        assert_eq!(tree.node("clk_rvpll").unwrap().multiplier(), 64);
        assert_eq!(tree.frequency_of("clk_appll").unwrap(), 1100.0);
        assert_eq!(tree.frequency_of("clk_rvpll").unwrap(), 1600.0);
        assert_eq!(tree.frequency_of("clk_tpu").unwrap(), 750.0);
        assert_eq!(tree.frequency_of("clk_tpu_gdma").unwrap(), 750.0);
    }

    #[test]
    fn overclock_keeps_manual_edits() {
        let mut tree = cv184x::clock_tree().unwrap();
        let fpll = tree.lookup("clk_fpll").unwrap();
        tree.set_multiplier(fpll, 30).unwrap();
        tree.apply_preset("OD").unwrap();
        assert_eq!(tree.node("clk_fpll").unwrap().multiplier(), 30);

        // The reset preset returns everything, including overclock targets.
        tree.apply_preset("ND").unwrap();
        assert_eq!(tree.node("clk_fpll").unwrap().multiplier(), 40);
        assert_eq!(tree.node("clk_rvpll").unwrap().multiplier(), 48);
        assert_eq!(tree.frequency_of("clk_tpu").unwrap(), 500.0);
    }

    #[test]
    fn preset_changes_are_in_traversal_order() {
        let mut tree = cv184x::clock_tree().unwrap();
        let changes = tree.apply_preset("overclock").unwrap();
        let positions: Vec<usize> = changes
            .iter()
            .map(|c| {
                tree.traversal_order()
                    .iter()
                    .position(|&id| id == c.id)
                    .unwrap()
            })
            .collect();
        assert!(positions.is_sorted(), "changes out of traversal order");
        assert!(names(&tree, &changes).contains(&"clk_appll"));
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let mut tree = cv184x::clock_tree().unwrap();
        assert_eq!(
            tree.apply_preset("turbo"),
            Err(ConfigError::PresetNotFound(String::from("turbo")))
        );
    }

    #[test]
    fn invalid_override_rejects_whole_preset() {
        let presets: PresetTable = [Preset::new("broken", PresetMode::Patch)
            .multiplier("clk_appll", 50)
            .divider("clk_tpu", Divider::from_units(0))]
        .into_iter()
        .collect();
        let mut tree = ClockTree::new(&cv184x::topology(), presets).unwrap();
        let before = tree.snapshot();
        let freqs: Vec<f64> = tree.nodes().iter().map(|n| n.frequency()).collect();

        let err = tree.apply_preset("broken").unwrap_err();

        assert!(matches!(err, ConfigError::InvalidConfig { .. }));
        assert_eq!(tree.snapshot(), before, "appll must not be half-applied");
        let after: Vec<f64> = tree.nodes().iter().map(|n| n.frequency()).collect();
        assert_eq!(after, freqs);
    }

    #[test]
    fn override_naming_unknown_node_is_rejected() {
        let presets: PresetTable = [Preset::new("typo", PresetMode::Patch)
            .multiplier("clk_appll", 44)
            .multiplier("clk_apll", 44)]
        .into_iter()
        .collect();
        let mut tree = ClockTree::new(&cv184x::topology(), presets).unwrap();
        assert_eq!(
            tree.apply_preset("typo"),
            Err(ConfigError::UnknownNode(String::from("clk_apll")))
        );
        assert_eq!(tree.node("clk_appll").unwrap().multiplier(), 40);
    }

    #[test]
    fn restore_round_trips_a_snapshot() {
        let mut tree = cv184x::clock_tree().unwrap();
        let saved = tree.snapshot();

        tree.apply_preset("overclock").unwrap();
        let cam0 = tree.lookup("clk_cam0pll").unwrap();
        tree.set_divider(cam0, 7.324_218_75).unwrap();
        let fab = tree.lookup("clk_fab_100m").unwrap();
        tree.set_enabled(fab, false).unwrap();

        let changes = tree.restore(&saved).unwrap();
        assert!(!changes.is_empty());
        assert_eq!(tree.snapshot(), saved);
        assert!(tree.is_live(fab));

        let fresh = cv184x::clock_tree().unwrap();
        for (a, b) in tree.nodes().iter().zip(fresh.nodes()) {
            assert_eq!(a.frequency(), b.frequency(), "{} differs", a.name());
        }
    }

    #[test]
    fn restore_rejects_edits_to_fixed_fields() {
        let mut tree = cv184x::clock_tree().unwrap();
        let mut saved = tree.snapshot();
        let osc = saved.iter_mut().find(|c| c.name == "clk_osc").unwrap();
        osc.multiplier = 2;
        let before = tree.snapshot();
        assert!(matches!(
            tree.restore(&saved),
            Err(ConfigError::InvalidConfig { .. })
        ));
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn lookup_by_alias() {
        let table = cv184x::presets();
        assert_eq!(table.find("ND").unwrap().name, "default");
        assert_eq!(table.find("OD").unwrap().name, "overclock");
        assert_eq!(table.find("overclock").unwrap().mode, PresetMode::Patch);
        assert!(table.find("od").is_none());
    }
}
