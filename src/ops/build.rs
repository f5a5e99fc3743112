//! The default goal: run the build pipeline.

use anyhow::Result;
use tracing::debug;

use crate::builder::BuildPipeline;
use crate::ops::Session;

pub fn execute(session: &Session) -> Result<()> {
    debug!(
        project = %session.config.proj_name,
        version = %session.config.proj_version,
        "starting build"
    );
    BuildPipeline::new(&session.config, &session.layout, &session.toolchain).run()
}
