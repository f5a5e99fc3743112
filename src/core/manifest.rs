//! Project manifest loading.
//!
//! `Mason.toml` is a flat table of scalar values; every entry becomes a
//! file-origin declared variable. Typing and origin policy live in the
//! catalog, so values are loaded as raw strings here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::errors::ConfigError;

pub const MANIFEST_NAME: &str = "Mason.toml";

/// Locate the manifest in the given project directory.
pub fn find_manifest(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_NAME);
    if !path.is_file() {
        bail!("could not find `{}` in `{}`", MANIFEST_NAME, dir.display());
    }
    Ok(path)
}

/// Load the manifest into raw name/value pairs.
pub fn load(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    parse(&text).with_context(|| format!("failed to parse `{}`", path.display()))
}

fn parse(text: &str) -> Result<BTreeMap<String, String>> {
    let table: toml::Table = toml::from_str(text)?;

    let mut vars = BTreeMap::new();
    for (name, value) in table {
        let raw = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Boolean(b) => if b { "1" } else { "0" }.to_string(),
            _ => {
                return Err(ConfigError::invalid(name.as_str(), "expected a scalar value").into());
            }
        };
        vars.insert(name, raw);
    }

    Ok(vars)
}
