//! Core data structures for Mason.
//!
//! - Variable catalog and origin-validated resolution
//! - Partial semantic versions and compatibility floors
//! - Output layout sandbox
//! - Toolchain name derivation
//! - Goal classification

pub mod errors;
pub mod layout;
pub mod manifest;
pub mod target;
pub mod toolchain;
pub mod vars;
pub mod version;

pub use errors::ConfigError;
pub use layout::OutputLayout;
pub use target::{DispatchPlan, TargetError};
pub use toolchain::Toolchain;
pub use vars::{Config, DeclaredValue, Origin};
pub use version::{CompatSpec, Version};
