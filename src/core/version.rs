//! Partial semantic versions with wildcard-on-omission semantics.
//!
//! Project and framework versions are dotted tuples of one to three
//! components. Omitted trailing components are *unspecified*, not zero:
//! `1.0` and `1` compare equal, while `1.0` and `1.1` differ on the minor
//! component. Zero-padding only happens for the ordering half of
//! compatibility checks.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A version with up to three components. `minor`/`patch` may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
}

/// Error parsing a dotted version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid semantic version \"{0}\"")]
pub struct ParseVersionError(pub String);

impl Version {
    pub fn new(major: u64, minor: Option<u64>, patch: Option<u64>) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Compare component-wise with weighted results.
    ///
    /// Returns `sign * weight` for the first component present in *both*
    /// versions that differs, where the weight is 3 for major, 2 for minor
    /// and 1 for patch. A component present on only one side never causes
    /// inequality, so `1.0` and `1` compare as 0.
    pub fn cmp_weighted(&self, other: &Version) -> i8 {
        let pairs = [
            (Some(self.major), Some(other.major), 3i8),
            (self.minor, other.minor, 2),
            (self.patch, other.patch, 1),
        ];

        for (a, b, weight) in pairs {
            if let (Some(a), Some(b)) = (a, b) {
                if a != b {
                    return if a < b { -weight } else { weight };
                }
            }
        }

        0
    }

    /// Zero-padded 3-tuple, used only for ordering in compatibility checks.
    pub fn zero_padded(&self) -> (u64, u64, u64) {
        (
            self.major,
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        )
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(ParseVersionError(s.to_string()));
        }

        let mut components = parts.iter().map(|p| {
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseVersionError(s.to_string()));
            }
            p.parse::<u64>().map_err(|_| ParseVersionError(s.to_string()))
        });

        let major = match components.next() {
            Some(c) => c?,
            None => return Err(ParseVersionError(s.to_string())),
        };
        let minor = components.next().transpose()?;
        let patch = components.next().transpose()?;

        Ok(Version {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{}", minor)?;
        }
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        Ok(())
    }
}

/// A compatibility floor within a bounded major-version window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatSpec {
    /// Inclusive minimum, at its declared precision.
    pub required: Version,
    /// How many majors above `required.major` remain acceptable.
    pub allowed_major_drift: u64,
}

/// Compatibility failure carrying the lowest compatible floor string,
/// e.g. `4.3.2+`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("incompatible version (minimum compatible: {floor})")]
pub struct IncompatibleVersion {
    pub floor: String,
}

impl CompatSpec {
    pub fn new(required: Version) -> Self {
        CompatSpec {
            required,
            allowed_major_drift: 0,
        }
    }

    pub fn with_drift(required: Version, allowed_major_drift: u64) -> Self {
        CompatSpec {
            required,
            allowed_major_drift,
        }
    }

    /// The floor string reported on failure: the required version at its
    /// declared precision, suffixed with `+`.
    pub fn floor(&self) -> String {
        format!("{}+", self.required)
    }

    /// A candidate is compatible iff its major lies in
    /// `[required.major, required.major + drift]` and its zero-padded tuple
    /// orders at or above the required one.
    pub fn check(&self, given: &Version) -> Result<(), IncompatibleVersion> {
        let drift_ok = given.major >= self.required.major
            && given.major - self.required.major <= self.allowed_major_drift;

        if !drift_ok || given.zero_padded() < self.required.zero_padded() {
            return Err(IncompatibleVersion {
                floor: self.floor(),
            });
        }

        Ok(())
    }
}
