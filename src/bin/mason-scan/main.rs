//! mason-scan - extract declared variable and function names from build
//! declaration files, for documentation generation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use mason::ops::scan;

#[derive(Parser)]
#[command(
    name = "mason-scan",
    version,
    about = "List declared variables and fn_* identifiers in build declarations"
)]
struct Cli {
    /// Directory to scan for declaration files.
    #[arg(value_name = "DIR", default_value = ".")]
    directory: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    for name in scan::scan_dir(&cli.directory)? {
        println!("{name}");
    }
    Ok(())
}
