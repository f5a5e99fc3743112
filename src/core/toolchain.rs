//! Toolchain program name resolution.
//!
//! Program names are derived, not located: an optional cross-toolchain
//! prefix is prepended to each platform default, and the pipeline invokes
//! whatever the resulting names resolve to on `PATH`.

/// Resolved toolchain program names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// C compiler.
    pub cc: String,
    /// C++ compiler.
    pub cxx: String,
    /// Assembler.
    pub asm: String,
    /// Static archiver.
    pub ar: String,
    /// Link driver.
    pub ld: String,
}

const DEFAULT_CC: &str = "gcc";
const DEFAULT_CXX: &str = "g++";
const DEFAULT_AS: &str = "as";
const DEFAULT_AR: &str = "ar";
const DEFAULT_LD: &str = "gcc";

/// Derive program names from an optional `CROSS_COMPILE` prefix.
///
/// With an empty prefix the platform defaults are used as-is; with prefix
/// `P`, every program becomes `P<default>` (e.g. `arm-none-eabi-gcc`).
pub fn resolve(cross_prefix: &str) -> Toolchain {
    Toolchain {
        cc: format!("{cross_prefix}{DEFAULT_CC}"),
        cxx: format!("{cross_prefix}{DEFAULT_CXX}"),
        asm: format!("{cross_prefix}{DEFAULT_AS}"),
        ar: format!("{cross_prefix}{DEFAULT_AR}"),
        ld: format!("{cross_prefix}{DEFAULT_LD}"),
    }
}
