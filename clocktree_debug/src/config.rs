// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saved configuration files.
//!
//! A configuration file is JSON of the form
//!
//! ```json
//! {
//!   "version": 1,
//!   "nodes": [
//!     { "name": "clk_a0pll", "multiplier": 8, "divider": 7.32421875, "enabled": true }
//!   ]
//! }
//! ```
//!
//! Dividers are written as JSON numbers using the shortest representation
//! that round-trips, so eight-place sub-PLL dividers survive a save/load
//! cycle unchanged. Dividers given as strings (`"7.32421875"`) are accepted
//! on load.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde_json::{Map, Value, json};

use clocktree_core::divider::Divider;
use clocktree_core::error::ConfigError;
use clocktree_core::tree::{ChangedNode, ClockTree, NodeConfig};

/// Version written to and accepted from configuration files.
pub const FORMAT_VERSION: u64 = 1;

/// A configuration file could not be written, read, or applied.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    /// Reading or writing the file failed.
    #[error("configuration i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid JSON.
    #[error("configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The file declares a format version this crate does not read.
    #[error("unsupported configuration version {0}")]
    Version(u64),
    /// The JSON is well-formed but not shaped like a configuration.
    #[error("malformed configuration: {0}")]
    Shape(String),
    /// The configuration parsed but the tree rejected it.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Renders the tree's current configuration as a JSON value.
#[must_use]
pub fn to_json(tree: &ClockTree) -> Value {
    let nodes: Vec<Value> = tree
        .snapshot()
        .into_iter()
        .map(|cfg| {
            json!({
                "name": cfg.name,
                "multiplier": cfg.multiplier,
                "divider": cfg.divider.to_f64(),
                "enabled": cfg.enabled,
            })
        })
        .collect();
    json!({
        "version": FORMAT_VERSION,
        "nodes": nodes,
    })
}

/// Writes the tree's configuration as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ConfigFileError::Json`] or [`ConfigFileError::Io`] if writing
/// fails.
pub fn write_config(tree: &ClockTree, writer: &mut dyn Write) -> Result<(), ConfigFileError> {
    serde_json::to_writer_pretty(&mut *writer, &to_json(tree))?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Parses a configuration without applying it.
///
/// # Errors
///
/// Returns [`ConfigFileError`] if the input is not JSON, has the wrong
/// version, or an entry is missing a field or has a value of the wrong
/// type. Range checks happen later, in [`ClockTree::restore`].
pub fn read_config(reader: &mut dyn Read) -> Result<Vec<NodeConfig>, ConfigFileError> {
    let root: Value = serde_json::from_reader(reader)?;
    let root = root
        .as_object()
        .ok_or_else(|| shape("top level must be an object"))?;

    let version = root
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| shape("missing integer `version`"))?;
    if version != FORMAT_VERSION {
        return Err(ConfigFileError::Version(version));
    }

    root.get("nodes")
        .and_then(Value::as_array)
        .ok_or_else(|| shape("missing array `nodes`"))?
        .iter()
        .enumerate()
        .map(|(i, entry)| parse_entry(i, entry))
        .collect()
}

/// Parses a configuration and restores it onto `tree` atomically.
///
/// # Errors
///
/// Returns [`ConfigFileError`] if parsing fails or the tree rejects any
/// entry; in both cases the tree is unchanged.
pub fn load_config(
    tree: &mut ClockTree,
    reader: &mut dyn Read,
) -> Result<Vec<ChangedNode>, ConfigFileError> {
    let configs = read_config(reader)?;
    Ok(tree.restore(&configs)?)
}

/// Saves the tree's configuration to a file, replacing it.
///
/// # Errors
///
/// As [`write_config`], plus failures creating the file.
pub fn save_file(tree: &ClockTree, path: &Path) -> Result<(), ConfigFileError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_config(tree, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Loads a configuration file onto `tree`.
///
/// # Errors
///
/// As [`load_config`], plus failures opening the file.
pub fn load_file(tree: &mut ClockTree, path: &Path) -> Result<Vec<ChangedNode>, ConfigFileError> {
    let mut reader = BufReader::new(File::open(path)?);
    load_config(tree, &mut reader)
}

fn parse_entry(index: usize, entry: &Value) -> Result<NodeConfig, ConfigFileError> {
    let obj: &Map<String, Value> = entry
        .as_object()
        .ok_or_else(|| shape(format!("nodes[{index}] must be an object")))?;
    let field = |key: &str| {
        obj.get(key)
            .ok_or_else(|| shape(format!("nodes[{index}] is missing `{key}`")))
    };

    let name = field("name")?
        .as_str()
        .ok_or_else(|| shape(format!("nodes[{index}].name must be a string")))?;
    let multiplier = field("multiplier")?
        .as_u64()
        .and_then(|m| u32::try_from(m).ok())
        .ok_or_else(|| shape(format!("nodes[{index}].multiplier must be an integer")))?;
    let divider = parse_divider(field("divider")?)
        .ok_or_else(|| shape(format!("nodes[{index}].divider is not an 8-place decimal")))?;
    let enabled = field("enabled")?
        .as_bool()
        .ok_or_else(|| shape(format!("nodes[{index}].enabled must be a boolean")))?;

    Ok(NodeConfig {
        name: name.to_owned(),
        multiplier,
        divider,
        enabled,
    })
}

fn parse_divider(value: &Value) -> Option<Divider> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(whole) => Divider::from_integer(whole),
            None => n.as_f64().and_then(Divider::from_f64),
        },
        Value::String(s) => Divider::parse(s),
        _ => None,
    }
}

fn shape(message: impl Into<String>) -> ConfigFileError {
    ConfigFileError::Shape(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clocktree_core::profile::cv184x;

    fn saved(tree: &ClockTree) -> Vec<u8> {
        let mut buf = Vec::new();
        write_config(tree, &mut buf).unwrap();
        buf
    }

    #[test]
    fn save_and_load_round_trips() {
        let mut tree = cv184x::clock_tree().unwrap();
        let cam0 = tree.lookup("clk_cam0pll").unwrap();
        tree.set_divider(cam0, 7.324_218_75).unwrap();
        tree.apply_preset("overclock").unwrap();
        let bytes = saved(&tree);
        let expected = tree.snapshot();

        let mut fresh = cv184x::clock_tree().unwrap();
        load_config(&mut fresh, &mut bytes.as_slice()).unwrap();
        assert_eq!(fresh.snapshot(), expected);
    }

    #[test]
    fn sub_pll_divider_text_is_exact() {
        let tree = cv184x::clock_tree().unwrap();
        let text = String::from_utf8(saved(&tree)).unwrap();
        assert!(text.contains("7.32421875"), "got: {text}");
    }

    #[test]
    fn string_dividers_are_accepted() {
        let json = br#"{"version":1,"nodes":[
            {"name":"clk_a0pll","multiplier":8,"divider":"7.32421875","enabled":true}
        ]}"#;
        let configs = read_config(&mut json.as_slice()).unwrap();
        assert_eq!(configs[0].divider, Divider::parse("7.32421875").unwrap());
    }

    #[test]
    fn malformed_files_are_rejected() {
        let cases: [&[u8]; 5] = [
            b"not json",
            br#"[]"#,
            br#"{"version":2,"nodes":[]}"#,
            br#"{"version":1,"nodes":[{"name":"clk_fpll"}]}"#,
            br#"{"version":1,"nodes":[{"name":"clk_fpll","multiplier":-1,"divider":1,"enabled":true}]}"#,
        ];
        for mut case in cases {
            assert!(read_config(&mut case).is_err(), "accepted {case:?}");
        }
        assert!(matches!(
            read_config(&mut br#"{"version":2,"nodes":[]}"#.as_slice()),
            Err(ConfigFileError::Version(2))
        ));
    }

    #[test]
    fn rejected_restore_leaves_tree_unchanged() {
        let mut tree = cv184x::clock_tree().unwrap();
        let before = tree.snapshot();
        let json = br#"{"version":1,"nodes":[
            {"name":"clk_appll","multiplier":44,"divider":1,"enabled":true},
            {"name":"clk_uart0","multiplier":1,"divider":0,"enabled":true}
        ]}"#;
        let err = load_config(&mut tree, &mut json.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::Config(ConfigError::InvalidConfig { .. })
        ));
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn save_and_load_through_a_file() {
        let path = std::env::temp_dir().join(format!(
            "clocktree-config-{}.json",
            std::process::id()
        ));
        let mut tree = cv184x::clock_tree().unwrap();
        let rv = tree.lookup("clk_rvpll").unwrap();
        tree.set_multiplier(rv, 64).unwrap();
        save_file(&tree, &path).unwrap();

        let mut fresh = cv184x::clock_tree().unwrap();
        let changes = load_file(&mut fresh, &path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(!changes.is_empty());
        assert_eq!(fresh.frequency_of("clk_rvpll").unwrap(), 1600.0);
    }
}
