//! Configuration error taxonomy.
//!
//! Every variant renders as a single line prefixed with the offending
//! variable name in brackets (`[PROJ_NAME] Missing value`). These shapes are
//! part of the external contract: downstream tooling and the test suite
//! match on them literally.

use thiserror::Error;

use crate::core::vars::Origin;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is undeclared, or a variable was declared empty.
    #[error("[{name}] Missing value")]
    MissingValue { name: String },

    /// The value arrived from an origin its catalog entry does not allow.
    /// `expected` is only present when the allowed-origin set is a singleton.
    #[error("[{name}] Unexpected origin: \"{actual}\"{}", origin_hint(.expected))]
    UnexpectedOrigin {
        name: String,
        actual: Origin,
        expected: Option<Origin>,
    },

    #[error("[{name}] Value cannot have whitespaces")]
    WhitespaceValue { name: String },

    /// Enum, boolean or semantic-version validation failure.
    #[error("[{name}] Invalid value{}", detail_hint(.detail))]
    InvalidValue {
        name: String,
        detail: Option<String>,
    },

    /// A subdirectory input is absolute or escapes its parent via `..`.
    #[error("[{name}] Invalid path: {value}")]
    InvalidPath { name: String, value: String },

    /// The project declared an internally derived variable.
    #[error("[{name}] Reserved variable")]
    ReservedVariable { name: String },

    /// `O` or `O_BASE` resolved to the project root itself.
    #[error("[{name}] Cannot be equal to Project root")]
    ProjectRootClash { name: String },

    /// An explicit `O` landed outside `O_BASE`.
    #[error("[O] Output directory is outside O_BASE (O={o}, O_BASE={base})")]
    OutsideBase { o: String, base: String },

    /// Framework/project compatibility gate failure; carries the lowest
    /// compatible floor string (e.g. `4.3.2+`).
    #[error("[{name}] Incompatible version (minimum compatible: {floor})")]
    IncompatibleVersion { name: String, floor: String },
}

impl ConfigError {
    pub fn missing(name: impl Into<String>) -> Self {
        ConfigError::MissingValue { name: name.into() }
    }

    pub fn invalid(name: impl Into<String>, detail: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            name: name.into(),
            detail: Some(detail.into()),
        }
    }
}

fn origin_hint(expected: &Option<Origin>) -> String {
    match expected {
        Some(origin) => format!(" (expected: \"{origin}\")"),
        None => String::new(),
    }
}

fn detail_hint(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_shapes() {
        let err = ConfigError::missing("PROJ_NAME");
        assert_eq!(err.to_string(), "[PROJ_NAME] Missing value");

        let err = ConfigError::UnexpectedOrigin {
            name: "PROJ_NAME".into(),
            actual: Origin::CommandLine,
            expected: Some(Origin::File),
        };
        assert_eq!(
            err.to_string(),
            "[PROJ_NAME] Unexpected origin: \"command line\" (expected: \"file\")"
        );

        let err = ConfigError::UnexpectedOrigin {
            name: "CROSS_COMPILE".into(),
            actual: Origin::CommandLine,
            expected: None,
        };
        assert_eq!(
            err.to_string(),
            "[CROSS_COMPILE] Unexpected origin: \"command line\""
        );

        let err = ConfigError::WhitespaceValue {
            name: "DEBUG".into(),
        };
        assert_eq!(err.to_string(), "[DEBUG] Value cannot have whitespaces");

        let err = ConfigError::OutsideBase {
            o: "output".into(),
            base: "build".into(),
        };
        assert_eq!(
            err.to_string(),
            "[O] Output directory is outside O_BASE (O=output, O_BASE=build)"
        );
    }
}
