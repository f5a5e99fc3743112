//! Variable catalog and origin-validated resolution.
//!
//! Every configuration variable the engine understands is listed in a
//! static catalog entry carrying its allowed origins, requiredness, default
//! and validator kind. Resolution walks the catalog in declared order and
//! stops at the first violation, producing either an immutable [`Config`]
//! snapshot or a single [`ConfigError`].

use std::collections::BTreeMap;
use std::fmt;

use crate::core::errors::ConfigError;
use crate::core::version::{CompatSpec, Version};

/// Where a declared value was supplied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Origin {
    Default,
    File,
    Environment,
    CommandLine,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Origin::Default => "default",
            Origin::File => "file",
            Origin::Environment => "environment",
            Origin::CommandLine => "command line",
        };
        write!(f, "{}", s)
    }
}

/// Validator attached to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Free text, no whitespace.
    Text,
    /// Whitespace-separated list.
    List,
    /// Member of a closed set.
    Enum(&'static [&'static str]),
    /// `0` or `1`.
    Bool,
    /// Dotted semantic version.
    SemVer,
    /// Path, no whitespace. Containment is checked by the sandbox.
    Path,
    /// Relative path that must stay inside its parent directory.
    Subdir,
}

impl ValueKind {
    fn allows_whitespace(&self) -> bool {
        matches!(self, ValueKind::List)
    }
}

/// Static catalog entry for one known variable.
#[derive(Debug, Clone, Copy)]
pub struct VarSpec {
    pub name: &'static str,
    pub origins: &'static [Origin],
    pub required: bool,
    pub default: Option<&'static str>,
    pub kind: ValueKind,
}

const FILE: &[Origin] = &[Origin::File];
const FILE_CMDLINE: &[Origin] = &[Origin::File, Origin::CommandLine];
const FILE_ENV: &[Origin] = &[Origin::File, Origin::Environment];
const CMDLINE: &[Origin] = &[Origin::CommandLine];

/// The closed variable catalog, in resolution (and print) order.
pub const CATALOG: &[VarSpec] = &[
    VarSpec {
        name: "PROJ_NAME",
        origins: FILE,
        required: true,
        default: None,
        kind: ValueKind::Text,
    },
    VarSpec {
        name: "PROJ_VERSION",
        origins: FILE,
        required: false,
        default: Some("0.1.0"),
        kind: ValueKind::SemVer,
    },
    VarSpec {
        name: "PROJ_TYPE",
        origins: FILE,
        required: true,
        default: None,
        kind: ValueKind::Enum(&["app", "lib", "custom"]),
    },
    VarSpec {
        name: "DEBUG",
        origins: FILE_CMDLINE,
        required: false,
        default: Some("0"),
        kind: ValueKind::Bool,
    },
    VarSpec {
        name: "CUSTOM_BUILD",
        origins: FILE,
        required: false,
        default: Some("0"),
        kind: ValueKind::Bool,
    },
    VarSpec {
        name: "V",
        origins: FILE_CMDLINE,
        required: false,
        default: Some("0"),
        kind: ValueKind::Bool,
    },
    VarSpec {
        name: "CROSS_COMPILE",
        origins: FILE_ENV,
        required: false,
        default: Some(""),
        kind: ValueKind::Text,
    },
    VarSpec {
        name: "MASON_MIN_VERSION",
        origins: FILE,
        required: false,
        default: None,
        kind: ValueKind::SemVer,
    },
    VarSpec {
        name: "O_BASE",
        origins: FILE_CMDLINE,
        required: false,
        default: None,
        kind: ValueKind::Path,
    },
    VarSpec {
        name: "O",
        origins: FILE_CMDLINE,
        required: false,
        default: None,
        kind: ValueKind::Path,
    },
    VarSpec {
        name: "BUILD_SUBDIR",
        origins: FILE_CMDLINE,
        required: false,
        default: None,
        kind: ValueKind::Subdir,
    },
    VarSpec {
        name: "DIST_SUBDIR",
        origins: FILE_CMDLINE,
        required: false,
        default: None,
        kind: ValueKind::Subdir,
    },
    VarSpec {
        name: "SRC_DIRS",
        origins: FILE,
        required: false,
        default: Some("src"),
        kind: ValueKind::List,
    },
    VarSpec {
        name: "VARS",
        origins: CMDLINE,
        required: false,
        default: None,
        kind: ValueKind::List,
    },
];

/// Names the engine derives internally. A declaration may never assign
/// them, regardless of origin.
pub const RESERVED: &[&str] = &["O_BUILD_DIR", "O_DIST_DIR"];

/// All names worth inspecting in the environment: the catalog plus the
/// reserved set.
pub fn known_names() -> impl Iterator<Item = &'static str> {
    CATALOG
        .iter()
        .map(|spec| spec.name)
        .chain(RESERVED.iter().copied())
}

/// A raw value tagged with the origin it arrived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredValue {
    pub raw: String,
    pub origin: Origin,
}

/// Merge the three declaration sources under the standard precedence:
/// command line > environment > file.
pub fn gather(
    file_vars: BTreeMap<String, String>,
    env_vars: BTreeMap<String, String>,
    cli_vars: &[(String, String)],
) -> BTreeMap<String, DeclaredValue> {
    let mut declared = BTreeMap::new();

    for (name, raw) in file_vars {
        declared.insert(
            name,
            DeclaredValue {
                raw,
                origin: Origin::File,
            },
        );
    }

    for (name, raw) in env_vars {
        declared.insert(
            name,
            DeclaredValue {
                raw,
                origin: Origin::Environment,
            },
        );
    }

    for (name, raw) in cli_vars {
        declared.insert(
            name.clone(),
            DeclaredValue {
                raw: raw.clone(),
                origin: Origin::CommandLine,
            },
        );
    }

    declared
}

/// Project type, a closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjType {
    App,
    Lib,
    Custom,
}

impl ProjType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjType::App => "app",
            ProjType::Lib => "lib",
            ProjType::Custom => "custom",
        }
    }
}

/// Resolved, validated configuration snapshot. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub proj_name: String,
    pub proj_version: Version,
    pub proj_type: ProjType,
    pub debug: bool,
    pub custom_build: bool,
    pub verbose: bool,
    pub cross_compile: String,
    pub min_mason_version: Option<Version>,
    pub o_base: Option<String>,
    pub o: Option<String>,
    pub build_subdir: Option<String>,
    pub dist_subdir: Option<String>,
    pub src_dirs: Vec<String>,
    pub vars_selector: Option<Vec<String>>,
}

/// Resolve the declared inputs against the catalog, failing fast on the
/// first violating variable in catalog order.
pub fn resolve(declared: &BTreeMap<String, DeclaredValue>) -> Result<Config, ConfigError> {
    for name in RESERVED {
        if declared.contains_key(*name) {
            return Err(ConfigError::ReservedVariable {
                name: name.to_string(),
            });
        }
    }

    let mut proj_name = None;
    let mut proj_version = None;
    let mut proj_type = None;
    let mut debug = false;
    let mut custom_build = false;
    let mut verbose = false;
    let mut cross_compile = String::new();
    let mut min_mason_version = None;
    let mut o_base = None;
    let mut o = None;
    let mut build_subdir = None;
    let mut dist_subdir = None;
    let mut src_dirs = Vec::new();
    let mut vars_selector = None;

    for spec in CATALOG {
        let raw = match validate_raw(spec, declared.get(spec.name))? {
            Some(raw) => raw,
            None => continue,
        };

        match spec.name {
            "PROJ_NAME" => proj_name = Some(raw.to_string()),
            "PROJ_VERSION" => proj_version = Some(parse_semver(spec.name, raw)?),
            "PROJ_TYPE" => {
                proj_type = Some(match raw {
                    "app" => ProjType::App,
                    "lib" => ProjType::Lib,
                    "custom" => ProjType::Custom,
                    other => {
                        return Err(ConfigError::invalid(
                            spec.name,
                            format!("\"{other}\" is not one of app, lib, custom"),
                        ))
                    }
                })
            }
            "DEBUG" => debug = parse_bool(spec.name, raw)?,
            "CUSTOM_BUILD" => custom_build = parse_bool(spec.name, raw)?,
            "V" => verbose = parse_bool(spec.name, raw)?,
            "CROSS_COMPILE" => cross_compile = raw.to_string(),
            "MASON_MIN_VERSION" => min_mason_version = Some(parse_semver(spec.name, raw)?),
            "O_BASE" => o_base = Some(raw.to_string()),
            "O" => o = Some(raw.to_string()),
            "BUILD_SUBDIR" => {
                check_subdir(spec.name, raw)?;
                build_subdir = Some(raw.to_string());
            }
            "DIST_SUBDIR" => {
                check_subdir(spec.name, raw)?;
                dist_subdir = Some(raw.to_string());
            }
            "SRC_DIRS" => {
                for dir in raw.split_whitespace() {
                    check_subdir(spec.name, dir)?;
                }
                src_dirs = raw.split_whitespace().map(str::to_string).collect();
            }
            "VARS" => {
                let names: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
                // A selector with zero names is as missing as no selector.
                if names.is_empty() {
                    return Err(ConfigError::missing(spec.name));
                }
                vars_selector = Some(names);
            }
            _ => unreachable!("unhandled catalog entry {}", spec.name),
        }
    }

    Ok(Config {
        proj_name: proj_name.unwrap_or_default(),
        proj_version: proj_version.unwrap_or(Version {
            major: 0,
            minor: Some(1),
            patch: Some(0),
        }),
        proj_type: proj_type.unwrap_or(ProjType::App),
        debug,
        custom_build,
        verbose,
        cross_compile,
        min_mason_version,
        o_base,
        o,
        build_subdir,
        dist_subdir,
        src_dirs,
        vars_selector,
    })
}

/// Origin, presence and whitespace checks shared by every catalog entry.
/// Returns the effective raw value, or `None` for an optional variable with
/// no value and no default.
fn validate_raw<'a>(
    spec: &VarSpec,
    declared: Option<&'a DeclaredValue>,
) -> Result<Option<&'a str>, ConfigError> {
    let (raw, origin) = match declared {
        Some(value) => (Some(value.raw.as_str()), value.origin),
        None => (spec.default, Origin::Default),
    };

    if origin != Origin::Default && !spec.origins.contains(&origin) {
        let expected = if spec.origins.len() == 1 {
            Some(spec.origins[0])
        } else {
            None
        };
        return Err(ConfigError::UnexpectedOrigin {
            name: spec.name.to_string(),
            actual: origin,
            expected,
        });
    }

    let raw = match raw {
        Some(raw) => raw,
        None if spec.required => return Err(ConfigError::missing(spec.name)),
        None => return Ok(None),
    };

    // An explicitly declared empty value is a missing value, unless the
    // catalog default itself is empty (CROSS_COMPILE).
    if raw.is_empty() {
        if origin != Origin::Default && spec.default != Some("") {
            return Err(ConfigError::missing(spec.name));
        }
        return Ok(Some(raw));
    }

    if !spec.kind.allows_whitespace() && raw.chars().any(char::is_whitespace) {
        return Err(ConfigError::WhitespaceValue {
            name: spec.name.to_string(),
        });
    }

    Ok(Some(raw))
}

fn parse_semver(name: &str, raw: &str) -> Result<Version, ConfigError> {
    raw.parse().map_err(|_| {
        ConfigError::invalid(name, format!("\"{raw}\" is not a valid semantic version"))
    })
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(ConfigError::invalid(
            name,
            format!("expected 0 or 1, got \"{other}\""),
        )),
    }
}

/// Subdirectory inputs must be relative and stay inside their parent.
fn check_subdir(name: &str, raw: &str) -> Result<(), ConfigError> {
    let path = std::path::Path::new(raw);
    if path.is_absolute() {
        return Err(ConfigError::InvalidPath {
            name: name.to_string(),
            value: raw.to_string(),
        });
    }

    let mut depth: i64 = 0;
    for component in path.components() {
        use std::path::Component;
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return Err(ConfigError::InvalidPath {
                        name: name.to_string(),
                        value: raw.to_string(),
                    });
                }
            }
            _ => depth += 1,
        }
    }

    Ok(())
}

/// Framework/project compatibility gate: `MASON_MIN_VERSION` is a floor
/// with no allowed major drift.
pub fn check_framework_compat(config: &Config, running: &Version) -> Result<(), ConfigError> {
    if let Some(min) = config.min_mason_version {
        CompatSpec::new(min)
            .check(running)
            .map_err(|err| ConfigError::IncompatibleVersion {
                name: "MASON_MIN_VERSION".to_string(),
                floor: err.floor,
            })?;
    }
    Ok(())
}
