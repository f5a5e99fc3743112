//! Command-line definitions for the `mason` binary.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "mason", version, about = "Build orchestration for C projects")]
pub struct Cli {
    /// Change to this project directory before doing anything.
    #[arg(short = 'C', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Path to Mason.toml.
    #[arg(short = 'f', long = "manifest-path", value_name = "PATH")]
    pub manifest_path: Option<PathBuf>,

    /// Goals and command-line variable assignments, in any order.
    #[arg(value_name = "GOAL|NAME=VALUE")]
    pub words: Vec<String>,
}

impl Cli {
    /// Split the trailing words into goals and `NAME=VALUE` assignments,
    /// preserving invocation order within each group.
    pub fn partition(&self) -> Result<(Vec<String>, Vec<(String, String)>)> {
        let mut goals = Vec::new();
        let mut assignments = Vec::new();

        for word in &self.words {
            match word.split_once('=') {
                Some((name, value)) => {
                    if name.is_empty() {
                        bail!("invalid assignment `{word}`: empty variable name");
                    }
                    assignments.push((name.to_string(), value.to_string()));
                }
                None => goals.push(word.clone()),
            }
        }

        Ok((goals, assignments))
    }
}
