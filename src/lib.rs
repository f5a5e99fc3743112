//! Mason - configuration resolution and build orchestration for C projects.
//!
//! This crate provides the core library functionality for Mason: the
//! variable registry with per-origin validation, the semantic-version
//! engine, the output-layout sandbox, toolchain resolution and the fixed
//! compile/link/package pipeline.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use crate::core::errors::ConfigError;
pub use crate::core::layout::OutputLayout;
pub use crate::core::target::{DispatchPlan, TargetError};
pub use crate::core::toolchain::Toolchain;
pub use crate::core::vars::{Config, Origin};
pub use crate::core::version::{CompatSpec, Version};

pub use crate::builder::{BuildPipeline, PipelineError};
pub use crate::ops::Session;
