//! Command-line interface definitions for dupescan.
//!
//! Two positional arguments are required: the directories to scan (joined
//! by `;`) and the report destination. Everything else is optional.
//!
//! # Example
//!
//! ```bash
//! # Scan two folders and write the report
//! dupescan "/data/photos;/backup/photos" /tmp/result.json
//!
//! # Keep going past unreadable files, with debug logging
//! dupescan -v --skip-unreadable /srv/share /tmp/result.json
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Find files with identical content across one or more directory trees.
///
/// Every regular file is fingerprinted with SHA-256; files sharing a
/// fingerprint are written to OUTPUT as a JSON report keyed by checksum.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan, separated by ';' (e.g. "/data/a;/data/b")
    #[arg(value_name = "ROOTS")]
    pub roots: String,

    /// Destination file for the JSON report (overwritten if present)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip files that cannot be read instead of aborting the scan
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Follow symbolic links during scan
    ///
    /// Symlink loops are detected and end the scan of that root.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Split the ROOTS argument on `separator`.
///
/// Empty segments (such as a trailing separator) are dropped with a
/// warning. There is no escaping: a path containing the separator cannot
/// be expressed.
///
/// # Examples
///
/// ```
/// use dupescan::cli::split_roots;
/// use std::path::PathBuf;
///
/// assert_eq!(
///     split_roots("/a;/b;", ';'),
///     vec![PathBuf::from("/a"), PathBuf::from("/b")]
/// );
/// ```
#[must_use]
pub fn split_roots(roots: &str, separator: char) -> Vec<PathBuf> {
    roots
        .split(separator)
        .filter(|segment| {
            if segment.is_empty() {
                log::warn!("Ignoring empty path in {:?}", roots);
                false
            } else {
                true
            }
        })
        .map(PathBuf::from)
        .collect()
}
