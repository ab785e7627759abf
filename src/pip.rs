//! Thin wrapper around the `pip` executable.

use anyhow::{Context, Result, bail};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::Command;
use std::time::Duration;

const PIP: &str = "pip";

/// Run `pip` with `args`, showing a spinner with `message` while it works.
///
/// A non-zero exit status is an error carrying pip's stderr.
pub fn run_pip<I, S>(args: I, message: &str) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut command = Command::new(PIP);
    command.args(args);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    let output = match command.output() {
        Ok(output) => output,
        Err(e) => {
            pb.finish_with_message(format!("{} {}", "x".red(), message));
            return Err(e).with_context(|| format!("Failed to run '{}' - is pip installed?", PIP));
        }
    };

    if !output.status.success() {
        pb.finish_with_message(format!("{} {}", "x".red(), message));
        bail!(
            "pip exited with {}:\n{}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim_end()
        );
    }

    pb.finish_with_message(format!("{} {}", "✓".green(), message));
    Ok(())
}

/// `pip install -t <dir> <packages> --no-compile --no-deps`
pub fn install_args(target_dir: &std::path::Path, packages: &[String]) -> Vec<String> {
    let mut args = vec![
        "install".to_string(),
        "-t".to_string(),
        target_dir.display().to_string(),
    ];
    args.extend(packages.iter().cloned());
    // Every transitive dependency must be listed in `packages` explicitly
    args.push("--no-compile".to_string());
    args.push("--no-deps".to_string());
    args
}

/// `pip download <packages> --no-binary :all: --no-deps -d <dir>`
pub fn download_args(dest_dir: &std::path::Path, packages: &[String]) -> Vec<String> {
    let mut args = vec!["download".to_string()];
    args.extend(packages.iter().cloned());
    args.extend(
        ["--no-binary", ":all:", "--no-deps", "-d"]
            .iter()
            .map(|s| s.to_string()),
    );
    args.push(dest_dir.display().to_string());
    args
}
