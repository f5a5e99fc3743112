//! Build execution: compile-unit discovery and the stage pipeline.

pub mod pipeline;
pub mod source;

pub use pipeline::{BuildPipeline, PipelineError};
pub use source::{CompileUnit, Language};
