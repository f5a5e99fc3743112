//! Build pipeline: compile, link, package.
//!
//! Stage ordering is fixed: every compile finishes before the link step,
//! and the link step finishes before distribution. Compile stages write to
//! unit-specific object paths and share no intermediate files, so they run
//! in parallel; link and dist are single sequential barriers.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::builder::source::{discover_units, CompileUnit, Language};
use crate::core::layout::OutputLayout;
use crate::core::toolchain::Toolchain;
use crate::core::vars::{Config, ProjType};
use crate::util::process::ProcessBuilder;

/// Failure of an external pipeline stage. The underlying tool's exit code
/// is preserved, never translated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("[{stage}] {program} failed{}", exit_hint(.status))]
    Stage {
        stage: &'static str,
        program: String,
        status: Option<i32>,
    },

    #[error("no source files found under: {dirs}")]
    NoSources { dirs: String },
}

impl PipelineError {
    /// Exit code to propagate for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Stage {
                status: Some(code), ..
            } => *code,
            _ => 1,
        }
    }
}

fn exit_hint(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by signal)".to_string(),
    }
}

/// Drives the fixed stage sequence over a resolved snapshot.
pub struct BuildPipeline<'a> {
    config: &'a Config,
    layout: &'a OutputLayout,
    toolchain: &'a Toolchain,
}

impl<'a> BuildPipeline<'a> {
    pub fn new(config: &'a Config, layout: &'a OutputLayout, toolchain: &'a Toolchain) -> Self {
        BuildPipeline {
            config,
            layout,
            toolchain,
        }
    }

    /// Run compile, link and dist. Any stage failure aborts the pipeline.
    pub fn run(&self) -> Result<()> {
        if self.config.proj_type == ProjType::Custom || self.config.custom_build {
            debug!("custom build: built-in stages skipped");
            return Ok(());
        }

        let units = discover_units(&self.layout.root, &self.config.src_dirs, self.layout)?;
        if units.is_empty() {
            return Err(PipelineError::NoSources {
                dirs: self.config.src_dirs.join(" "),
            }
            .into());
        }

        debug!(units = units.len(), "compiling");
        units.par_iter().try_for_each(|unit| self.compile(unit))?;

        let objects: Vec<PathBuf> = units.iter().map(|u| u.object.clone()).collect();
        let artifact = self.link(&objects)?;
        self.dist(&artifact)?;

        Ok(())
    }

    fn compile(&self, unit: &CompileUnit) -> Result<()> {
        let abs_object = self.layout.absolute(&unit.object);
        if let Some(parent) = abs_object.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }

        let command = self.compile_command(unit);
        self.run_stage("CC", &unit.object, command)
    }

    /// Command line for one compile unit; pure so tests can inspect it.
    pub fn compile_command(&self, unit: &CompileUnit) -> ProcessBuilder {
        let program = match unit.lang {
            Language::C => &self.toolchain.cc,
            Language::Cxx => &self.toolchain.cxx,
            Language::Asm => &self.toolchain.asm,
        };
        let mut command = ProcessBuilder::new(program.clone()).cwd(&self.layout.root);

        if unit.lang != Language::Asm {
            command = command.args(["-MMD", "-MP"]);
            for dir in &self.config.src_dirs {
                command = command.arg(format!("-I{dir}"));
            }
            command = command.arg("-Wall");
            command = if self.config.debug {
                command.args(["-O0", "-g"])
            } else {
                command.args(["-O2", "-s"])
            };
            command = command.arg("-c").arg(&unit.source);
        } else {
            command = command.arg(&unit.source);
        }

        command.arg("-o").arg(&unit.object)
    }

    fn link(&self, objects: &[PathBuf]) -> Result<PathBuf> {
        let (artifact, command) = self.link_command(objects);

        let abs_artifact = self.layout.absolute(&artifact);
        if let Some(parent) = abs_artifact.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }

        self.run_stage("LD", &artifact, command)?;
        Ok(artifact)
    }

    /// Link (or archive) command and its artifact path.
    pub fn link_command(&self, objects: &[PathBuf]) -> (PathBuf, ProcessBuilder) {
        match self.config.proj_type {
            ProjType::Lib => {
                let artifact = self
                    .layout
                    .build_dir
                    .join(format!("lib{}.a", self.config.proj_name));
                let command = ProcessBuilder::new(self.toolchain.ar.clone())
                    .cwd(&self.layout.root)
                    .arg("rcs")
                    .arg(&artifact)
                    .args(objects);
                (artifact, command)
            }
            _ => {
                let artifact = self.layout.build_dir.join(&self.config.proj_name);
                let mut command = ProcessBuilder::new(self.toolchain.ld.clone())
                    .cwd(&self.layout.root)
                    .arg("-o")
                    .arg(&artifact)
                    .args(objects);
                if !self.config.debug {
                    command = command.arg("-s");
                }
                (artifact, command)
            }
        }
    }

    fn dist(&self, artifact: &Path) -> Result<()> {
        let destination = match self.config.proj_type {
            ProjType::Lib => self
                .layout
                .dist_dir
                .join("lib")
                .join(format!("lib{}.a", self.config.proj_name)),
            _ => self.layout.dist_dir.join("bin").join(&self.config.proj_name),
        };

        self.copy_artifact(artifact, &destination)?;

        if self.config.proj_type == ProjType::Lib {
            self.dist_headers()?;
        }

        Ok(())
    }

    /// Public headers of a library project ship alongside the archive.
    fn dist_headers(&self) -> Result<()> {
        let include_dir = self.layout.root.join("include");
        if !include_dir.is_dir() {
            return Ok(());
        }

        for entry in walkdir::WalkDir::new(&include_dir).sort_by_file_name() {
            let entry = entry.context("failed to scan `include`")?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) != Some("h") {
                continue;
            }

            let rel = entry
                .path()
                .strip_prefix(&self.layout.root)
                .unwrap_or(entry.path());
            let destination = self.layout.dist_dir.join(rel);
            self.copy_artifact(rel, &destination)?;
        }

        Ok(())
    }

    fn copy_artifact(&self, source: &Path, destination: &Path) -> Result<()> {
        let abs_source = self.layout.absolute(source);
        let abs_destination = self.layout.absolute(destination);
        if let Some(parent) = abs_destination.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }

        self.emit_stage(
            "DIST",
            destination,
            &format!("cp {} {}", source.display(), destination.display()),
        );
        std::fs::copy(&abs_source, &abs_destination).with_context(|| {
            format!(
                "failed to copy `{}` to `{}`",
                abs_source.display(),
                abs_destination.display()
            )
        })?;

        Ok(())
    }

    fn run_stage(&self, stage: &'static str, output: &Path, command: ProcessBuilder) -> Result<()> {
        self.emit_stage(stage, output, &command.command_line());

        let status = command.exec_status()?;
        if !status.success() {
            return Err(PipelineError::Stage {
                stage,
                program: command.get_program().to_string(),
                status: status.code(),
            }
            .into());
        }

        Ok(())
    }

    /// Tag line, plus the literal command line in verbose mode. Both lines
    /// go out under one lock so parallel compiles cannot interleave them.
    fn emit_stage(&self, tag: &str, output: &Path, command: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "[{tag}] {}", output.display());
        if self.config.verbose {
            let _ = writeln!(stdout, "{command}");
        }
    }
}
