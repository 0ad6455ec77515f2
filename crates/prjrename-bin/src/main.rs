mod cli;
mod diff;

use anyhow::Result;
use cli::Cli;
use prjrename_core::{RenameOptions, RenameSummary};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    let Some(target) = cli.target.clone() else {
        print_usage();
        return Ok(());
    };

    info!("Starting prjrename");

    handle_rename(target, cli.dry_run, cli.interactive)?;

    info!("Prjrename completed successfully");
    Ok(())
}

fn print_usage() {
    println!("Usage: prjrename <PROJECT_DIRECTORY>");
    println!("Point prjrename at a directory holding a single Altium project file (.PrjPcb, .PrjHar or .PrjMbd).");
    println!("Files named with [Parameter] placeholders are renamed using the project's parameter values.");
    println!("Run 'prjrename --help' for all options.");
}

fn handle_rename(target: PathBuf, dry_run: bool, interactive: bool) -> Result<()> {
    if !target.is_dir() {
        anyhow::bail!("Directory {:?} not found or is not a valid directory", target);
    }
    let target_dir = std::path::absolute(&target)?;

    info!("Target directory: {:?}", target_dir);
    info!("Interactive mode: {}", interactive);

    let options = RenameOptions { dry_run };

    let summary = if interactive {
        let content_callback = |file_path: &Path, old_content: &str, new_content: &str, description: &str| {
            diff::show_diff_and_confirm(file_path, old_content, new_content, description)
        };

        let path_callback = |old_path: &Path, new_path: &Path, change_type: &str| {
            diff::show_path_change_and_confirm(old_path, new_path, change_type)
        };

        prjrename_core::rename_project_interactive(&target_dir, &options, content_callback, path_callback)?
    } else {
        prjrename_core::rename_project(&target_dir, &options)?
    };

    print_summary(&summary);

    Ok(())
}

fn print_summary(summary: &RenameSummary) {
    println!("Rename complete!");
    println!("  Project file: {}", summary.descriptor.display());
    println!("  Files renamed: {}", summary.files_renamed());
    println!("  Files skipped: {}", summary.skipped.len());
    println!("  References updated: {}", summary.references_updated);
}

fn log_level(cli: &Cli) -> &'static str {
    match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, true) => "debug",
        _ => "info",
    }
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let format = fmt::layer()
        .with_target(false)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(format)
        .with(EnvFilter::new(log_level(cli)))
        .try_init()?;

    Ok(())
}
