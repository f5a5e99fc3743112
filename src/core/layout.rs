//! Output directory layout and sandbox enforcement.
//!
//! Computes where build and dist artifacts go and guarantees that the
//! computed directories never coincide with the project root and never
//! escape the declared base directory. All checks are lexical and happen
//! before any filesystem mutation.

use std::path::{Component, Path, PathBuf};

use crate::core::errors::ConfigError;
use crate::core::vars::Config;

/// Default base directory when neither `O` nor `O_BASE` is declared.
pub const DEFAULT_BASE: &str = "output";

/// Resolved output layout. Paths are kept relative to the project root
/// whenever they live beneath it, so stage tags and `print-vars` output
/// stay short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Absolute project root.
    pub root: PathBuf,
    /// `O_BASE`: the sandbox boundary.
    pub base: PathBuf,
    /// `O`: the (possibly host/mode-qualified) output directory.
    pub out: PathBuf,
    /// `O_BUILD_DIR`: where objects and linked artifacts go.
    pub build_dir: PathBuf,
    /// `O_DIST_DIR`: where distributable artifacts go.
    pub dist_dir: PathBuf,
}

/// Host identifier used in the default qualified output segment,
/// e.g. `linux-x86_64`.
pub fn native_host() -> String {
    format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}

/// Compute the output layout for a resolved configuration.
///
/// Without overrides the layout nests a host/mode-qualified segment under
/// the base: `output/<host>/<release|debug>`. An explicit `O` replaces the
/// whole qualified segment and, unless `O_BASE` is itself declared, pins
/// the base to the same directory.
pub fn resolve(config: &Config, root: &Path) -> Result<OutputLayout, ConfigError> {
    let root = lexical_normalize(root);

    let base_abs = match (&config.o_base, &config.o) {
        (Some(base), _) => join_normalized(&root, base),
        (None, Some(o)) => join_normalized(&root, o),
        (None, None) => root.join(DEFAULT_BASE),
    };

    let out_abs = match &config.o {
        Some(o) => join_normalized(&root, o),
        None => {
            let mode = if config.debug { "debug" } else { "release" };
            base_abs.join(native_host()).join(mode)
        }
    };

    if config.o_base.is_some() && base_abs == root {
        return Err(ConfigError::ProjectRootClash {
            name: "O_BASE".to_string(),
        });
    }
    if out_abs == root {
        return Err(ConfigError::ProjectRootClash {
            name: "O".to_string(),
        });
    }

    if out_abs != base_abs && !out_abs.starts_with(&base_abs) {
        return Err(ConfigError::OutsideBase {
            o: config.o.clone().unwrap_or_default(),
            base: config
                .o_base
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE.to_string()),
        });
    }

    let mut build_dir = out_abs.join("build");
    if let Some(subdir) = &config.build_subdir {
        build_dir.push(subdir);
    }
    let mut dist_dir = out_abs.join("dist");
    if let Some(subdir) = &config.dist_subdir {
        dist_dir.push(subdir);
    }

    Ok(OutputLayout {
        base: display_path(&root, &base_abs),
        out: display_path(&root, &out_abs),
        build_dir: display_path(&root, &lexical_normalize(&build_dir)),
        dist_dir: display_path(&root, &lexical_normalize(&dist_dir)),
        root,
    })
}

impl OutputLayout {
    /// Absolute form of a layout path (they are stored root-relative when
    /// they live beneath the root).
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Collapse `.` and `..` components lexically, without touching the
/// filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn join_normalized(root: &Path, raw: &str) -> PathBuf {
    lexical_normalize(&root.join(raw))
}

/// Prefer the root-relative form for anything beneath the root.
fn display_path(root: &Path, abs: &Path) -> PathBuf {
    match pathdiff::diff_paths(abs, root) {
        Some(rel) if !rel.starts_with("..") && !rel.as_os_str().is_empty() => rel,
        _ => abs.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vars::{gather, resolve as resolve_vars};
    use std::collections::BTreeMap;

    fn config(cli: &[(&str, &str)]) -> Config {
        let file_vars: BTreeMap<_, _> = [
            ("PROJ_NAME".to_string(), "hello".to_string()),
            ("PROJ_TYPE".to_string(), "app".to_string()),
        ]
        .into();
        let cli: Vec<_> = cli
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        resolve_vars(&gather(file_vars, BTreeMap::new(), &cli)).unwrap()
    }

    fn root() -> PathBuf {
        PathBuf::from("/work/project")
    }

    #[test]
    fn test_default_layout_is_host_and_mode_qualified() {
        let layout = resolve(&config(&[]), &root()).unwrap();
        let expected = PathBuf::from(format!("output/{}/release", native_host()));
        assert_eq!(layout.base, PathBuf::from("output"));
        assert_eq!(layout.out, expected);
        assert_eq!(layout.build_dir, expected.join("build"));
        assert_eq!(layout.dist_dir, expected.join("dist"));
    }

    #[test]
    fn test_debug_mode_switches_segment() {
        let layout = resolve(&config(&[("DEBUG", "1")]), &root()).unwrap();
        assert_eq!(
            layout.out,
            PathBuf::from(format!("output/{}/debug", native_host()))
        );
    }

    #[test]
    fn test_explicit_o_pins_base() {
        let layout = resolve(&config(&[("O", "build")]), &root()).unwrap();
        assert_eq!(layout.out, PathBuf::from("build"));
        assert_eq!(layout.base, PathBuf::from("build"));
        assert_eq!(layout.build_dir, PathBuf::from("build/build"));
        assert_eq!(layout.dist_dir, PathBuf::from("build/dist"));
    }

    #[test]
    fn test_subdirs_extend_build_and_dist() {
        let layout = resolve(
            &config(&[
                ("O", "output"),
                ("BUILD_SUBDIR", "subDir"),
                ("DIST_SUBDIR", "extra"),
            ]),
            &root(),
        )
        .unwrap();
        assert_eq!(layout.build_dir, PathBuf::from("output/build/subDir"));
        assert_eq!(layout.dist_dir, PathBuf::from("output/dist/extra"));
    }

    #[test]
    fn test_o_equal_project_root_rejected() {
        let err = resolve(&config(&[("O", ".")]), &root()).unwrap_err();
        assert_eq!(err.to_string(), "[O] Cannot be equal to Project root");
    }

    #[test]
    fn test_o_base_equal_project_root_rejected() {
        let err = resolve(&config(&[("O_BASE", "."), ("O", "output")]), &root()).unwrap_err();
        assert_eq!(err.to_string(), "[O_BASE] Cannot be equal to Project root");
    }

    #[test]
    fn test_o_outside_base_rejected() {
        let err = resolve(&config(&[("O_BASE", "build"), ("O", "output")]), &root()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "[O] Output directory is outside O_BASE (O=output, O_BASE=build)"
        );
    }

    #[test]
    fn test_o_inside_declared_base_accepted() {
        let layout = resolve(
            &config(&[("O_BASE", "out"), ("O", "out/nightly")]),
            &root(),
        )
        .unwrap();
        assert_eq!(layout.base, PathBuf::from("out"));
        assert_eq!(layout.out, PathBuf::from("out/nightly"));
    }

    #[test]
    fn test_absolute_o_outside_root_is_kept_absolute() {
        let layout = resolve(&config(&[("O", "/tmp/elsewhere/output")]), &root()).unwrap();
        assert_eq!(layout.out, PathBuf::from("/tmp/elsewhere/output"));
        assert_eq!(
            layout.build_dir,
            PathBuf::from("/tmp/elsewhere/output/build")
        );
    }

    #[test]
    fn test_dotdot_escape_to_root_rejected() {
        // output/.. normalizes back to the project root.
        let err = resolve(&config(&[("O", "output/..")]), &root()).unwrap_err();
        assert_eq!(err.to_string(), "[O] Cannot be equal to Project root");
    }

    #[test]
    fn test_layout_is_idempotent() {
        let config = config(&[("BUILD_SUBDIR", "x")]);
        assert_eq!(
            resolve(&config, &root()).unwrap(),
            resolve(&config, &root()).unwrap()
        );
    }
}
