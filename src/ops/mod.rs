//! High-level operations.
//!
//! Each goal is implemented over a [`Session`]: the immutable configuration,
//! layout and toolchain snapshot resolved once per invocation.

pub mod build;
pub mod deps;
pub mod print_vars;
pub mod scan;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::core::layout::{self, OutputLayout};
use crate::core::manifest;
use crate::core::toolchain::{self, Toolchain};
use crate::core::vars::{self, Config};
use crate::core::version::Version;

/// Everything resolved for one invocation. Never shared across invocations.
#[derive(Debug, Clone)]
pub struct Session {
    pub root: PathBuf,
    pub config: Config,
    pub layout: OutputLayout,
    pub toolchain: Toolchain,
}

/// Version of the running framework, used by the compatibility gate.
pub fn framework_version() -> Version {
    env!("CARGO_PKG_VERSION")
        .parse()
        .unwrap_or(Version::new(0, None, None))
}

/// Read declared values out of the environment. Only names the catalog or
/// the reserved set knows about are inspected.
pub fn gather_env() -> BTreeMap<String, String> {
    vars::known_names()
        .filter_map(|name| std::env::var(name).ok().map(|raw| (name.to_string(), raw)))
        .collect()
}

/// Resolve the full snapshot for one invocation: manifest, environment and
/// command-line assignments through the registry, then layout and toolchain.
pub fn resolve_session(
    root: &Path,
    manifest_path: Option<&Path>,
    env_vars: BTreeMap<String, String>,
    cli_vars: &[(String, String)],
) -> Result<Session> {
    let manifest_path = match manifest_path {
        Some(path) => path.to_path_buf(),
        None => manifest::find_manifest(root)?,
    };
    debug!(manifest = %manifest_path.display(), "loading project declaration");
    let file_vars = manifest::load(&manifest_path)?;

    let declared = vars::gather(file_vars, env_vars, cli_vars);
    let config = vars::resolve(&declared)?;
    vars::check_framework_compat(&config, &framework_version())?;

    let layout = layout::resolve(&config, root)?;
    let toolchain = toolchain::resolve(&config.cross_compile);
    debug!(
        out = %layout.out.display(),
        cc = %toolchain.cc,
        "resolved configuration for `{}`", config.proj_name
    );

    Ok(Session {
        root: layout.root.clone(),
        config,
        layout,
        toolchain,
    })
}
