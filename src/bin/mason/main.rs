//! Mason CLI - configuration resolution and build orchestration for C projects.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mason::core::target::{self, DispatchPlan, TargetError};
use mason::core::ConfigError;
use mason::ops;
use mason::PipelineError;

mod cli;

use cli::Cli;

/// Exit code for configuration and target-dispatch failures.
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Variable and target errors carry their own documented,
            // single-line shapes; everything else gets the generic prefix.
            if let Some(config_err) = e.downcast_ref::<ConfigError>() {
                eprintln!("{config_err}");
                return ExitCode::from(EXIT_CONFIG);
            }
            if let Some(target_err) = e.downcast_ref::<TargetError>() {
                eprintln!("{target_err}");
                return ExitCode::from(EXIT_CONFIG);
            }
            if let Some(pipeline_err) = e.downcast_ref::<PipelineError>() {
                eprintln!("{pipeline_err}");
                return ExitCode::from(pipeline_err.exit_code().clamp(1, 255) as u8);
            }
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mason=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let root = match &cli.directory {
        Some(dir) => std::env::current_dir()?.join(dir),
        None => std::env::current_dir()?,
    };

    let (goals, assignments) = cli.partition()?;

    let manifest_path: Option<PathBuf> = cli.manifest_path.as_ref().map(|path| {
        if path.is_absolute() {
            path.clone()
        } else {
            root.join(path)
        }
    });

    let session = ops::resolve_session(
        &root,
        manifest_path.as_deref(),
        ops::gather_env(),
        &assignments,
    )?;

    match target::classify(&goals)? {
        DispatchPlan::Build => ops::build::execute(&session),
        DispatchPlan::Deps => ops::deps::execute(&session),
        DispatchPlan::PrintVars => ops::print_vars::execute(&session),
    }
}
