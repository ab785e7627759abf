//! # vendy CLI Entry Point
//!
//! Parses CLI arguments using clap and runs the vendoring pipeline.
//!
//! ## Commands
//!
//! - `vendy` / `vendy vendorize` - Clean, install, rewrite imports, collect licenses
//! - `vendy update-stubs` - The above, then generate `.pyi` stubs
//! - `vendy completions <shell>` - Print shell completions

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

use vendy::config::{self, VendyConfig};
use vendy::license;
use vendy::stubs;
use vendy::vendor;

#[derive(Parser)]
#[command(name = "vendy")]
#[command(about = "Vendor third-party Python packages into your project", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the pyproject.toml holding [tool.vendy]
    #[arg(long, global = true, default_value = "pyproject.toml")]
    pyproject: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Vendor the configured packages (default)
    Vendorize,
    /// Vendor, then write .pyi stubs for every vendored library
    UpdateStubs,
    /// Generate shell completions
    Completions {
        /// Shell to generate for (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "vendy", &mut std::io::stdout());
        return Ok(());
    }

    let config = config::load_config(&cli.pyproject)?;
    revendor(&config)?;

    if let Some(Commands::UpdateStubs) = cli.command {
        stubs::update_stubs(&config)?;
    }

    Ok(())
}

fn revendor(config: &VendyConfig) -> Result<()> {
    println!(
        "{} Using vendor dir: {}",
        "⚡".yellow(),
        config.vendor_dir().display()
    );

    vendor::clean_vendor(config)?;
    vendor::vendor(config)?;
    license::download_licenses(config)?;

    println!("{} Revendoring complete", "✓".green());
    Ok(())
}
