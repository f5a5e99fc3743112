//! The `print-vars` goal: inspect resolved variables.
//!
//! Output is `NAME = value`, one per line, in catalog order; derived
//! (reserved) names print after the catalog. A selector restricts the set
//! but never reorders it.

use anyhow::Result;

use crate::core::layout::native_host;
use crate::core::vars::CATALOG;
use crate::ops::Session;

/// Derived names, printable but never user-settable.
const DERIVED: &[&str] = &["O_BUILD_DIR", "O_DIST_DIR", "CC", "CXX", "AS", "AR", "LD", "HOST"];

/// Resolved display value for a printable name.
pub fn value_of(session: &Session, name: &str) -> Option<String> {
    let config = &session.config;
    let value = match name {
        "PROJ_NAME" => config.proj_name.clone(),
        "PROJ_VERSION" => config.proj_version.to_string(),
        "PROJ_TYPE" => config.proj_type.as_str().to_string(),
        "DEBUG" => bool01(config.debug),
        "CUSTOM_BUILD" => bool01(config.custom_build),
        "V" => bool01(config.verbose),
        "CROSS_COMPILE" => config.cross_compile.clone(),
        "MASON_MIN_VERSION" => config
            .min_mason_version
            .map(|v| v.to_string())
            .unwrap_or_default(),
        "O_BASE" => session.layout.base.display().to_string(),
        "O" => session.layout.out.display().to_string(),
        "BUILD_SUBDIR" => config.build_subdir.clone().unwrap_or_default(),
        "DIST_SUBDIR" => config.dist_subdir.clone().unwrap_or_default(),
        "SRC_DIRS" => config.src_dirs.join(" "),
        "O_BUILD_DIR" => session.layout.build_dir.display().to_string(),
        "O_DIST_DIR" => session.layout.dist_dir.display().to_string(),
        "CC" => session.toolchain.cc.clone(),
        "CXX" => session.toolchain.cxx.clone(),
        "AS" => session.toolchain.asm.clone(),
        "AR" => session.toolchain.ar.clone(),
        "LD" => session.toolchain.ld.clone(),
        "HOST" => native_host(),
        _ => return None,
    };
    Some(value)
}

/// Render the requested lines. `None` selects the whole printable set.
pub fn render(session: &Session) -> Vec<String> {
    let selector = session.config.vars_selector.as_deref();
    let selected = |name: &str| match selector {
        Some(names) => names.iter().any(|n| n == name),
        None => true,
    };

    let mut lines = Vec::new();
    let mut printed = Vec::new();

    let printable = CATALOG
        .iter()
        .map(|spec| spec.name)
        .filter(|name| *name != "VARS")
        .chain(DERIVED.iter().copied());
    for name in printable {
        if selected(name) {
            if let Some(value) = value_of(session, name) {
                lines.push(format!("{name} = {value}"));
                printed.push(name);
            }
        }
    }

    // Names the catalog does not know print empty, in request order.
    if let Some(names) = selector {
        for name in names {
            if !printed.iter().any(|p| p == name) {
                lines.push(format!("{name} = "));
            }
        }
    }

    lines
}

pub fn execute(session: &Session) -> Result<()> {
    for line in render(session) {
        println!("{line}");
    }
    Ok(())
}

fn bool01(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
