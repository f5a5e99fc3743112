//! Declaration discovery for documentation tooling.
//!
//! Walks a directory tree for build-declaration files and extracts declared
//! variable names and `fn_*` identifiers by lexical pattern matching. The
//! result feeds documentation generation; nothing here is consulted at
//! build time.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use walkdir::WalkDir;

/// Identifiers supplied by the environment or derived internally; never
/// interesting to document as project declarations.
const EXCLUDED: &[&str] = &[
    "OS",
    "PATH",
    "HOME",
    "PWD",
    "SHELL",
    "USER",
    "LANG",
    "TERM",
    "HOSTNAME",
    "O_BUILD_DIR",
    "O_DIST_DIR",
];

fn var_declaration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*([A-Z][A-Z0-9_]*)\s*=").unwrap())
}

fn fn_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bfn_[A-Za-z0-9_]+").unwrap())
}

/// Extract declared names from one file's contents.
pub fn scan_text(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    for capture in var_declaration().captures_iter(text) {
        names.insert(capture[1].to_string());
    }
    for found in fn_identifier().find_iter(text) {
        names.insert(found.as_str().to_string());
    }

    names.retain(|name| !EXCLUDED.contains(&name.as_str()));
    names
}

/// Scan every `.toml` declaration file under `dir`, sorted output.
pub fn scan_dir(dir: &Path) -> Result<Vec<String>> {
    let mut names = BTreeSet::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to scan `{}`", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("toml") {
            continue;
        }

        let text = std::fs::read_to_string(entry.path())
            .with_context(|| format!("failed to read `{}`", entry.path().display()))?;
        names.extend(scan_text(&text));
    }

    Ok(names.into_iter().collect())
}
