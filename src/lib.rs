//! dupescan - content-hash duplicate file reporter
//!
//! Walks one or more directory trees, fingerprints every regular file with
//! SHA-256, and writes the groups of files sharing a fingerprint to a JSON
//! report. Nothing is ever deleted or linked.
//!
//! The pipeline is linear:
//!
//! roots → [`inventory::InventoryBuilder`] (drives [`scanner::Walker`],
//! calls [`scanner::Hasher`]) → [`inventory::Inventory`] →
//! [`duplicates::find_duplicates`] → [`duplicates::DuplicateGroups`] →
//! [`output::JsonOutput`] → report file.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod output;
pub mod scanner;

use std::time::Instant;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::inventory::InventoryBuilder;
use crate::output::JsonOutput;

/// Run a full scan for the parsed command line.
///
/// Logging must already be initialized by the caller. Every fatal
/// condition is returned as an error; deciding the process exit status is
/// left to the caller.
///
/// # Errors
///
/// Fails if the configuration is invalid, no roots remain after splitting,
/// a file cannot be fingerprinted (unless skipping is enabled), or the
/// report cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let roots = cli::split_roots(&cli.roots, config.separator);
    if roots.is_empty() {
        anyhow::bail!("No directories to scan in {:?}", cli.roots);
    }

    let start = Instant::now();
    let builder = InventoryBuilder::new(config.inventory_config());
    let (inventory, stats) = builder
        .build(&roots)
        .context("Unable to build file inventory")?;

    let groups = duplicates::find_duplicates(&inventory);

    JsonOutput::new(&groups)
        .with_indent(config.indent)
        .write_file(&cli.output)
        .with_context(|| format!("Unable to write report to {}", cli.output.display()))?;

    log::info!(
        "Scanned {} file(s) ({} bytes) in {} root(s) in {:.2?}",
        stats.files,
        stats.bytes,
        stats.roots,
        start.elapsed()
    );
    log::info!(
        "Found {} duplicate group(s) with {} file(s), {} bytes reclaimable; report written to {}",
        groups.len(),
        groups.file_count(),
        groups.reclaimable_bytes(),
        cli.output.display()
    );
    if !stats.traversal_errors.is_empty() {
        log::warn!(
            "{} root(s) were not fully scanned; see warnings above",
            stats.traversal_errors.len()
        );
    }
    if !stats.unreadable_files.is_empty() {
        log::warn!(
            "{} unreadable file(s) were left out of the report",
            stats.unreadable_files.len()
        );
    }

    Ok(ExitCode::Success)
}
