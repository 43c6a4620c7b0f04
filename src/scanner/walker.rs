//! Directory walker implementation using walkdir for sequential traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which visits every entry
//! below a root (the root included) and hands each one to a callback.
//! Children are sorted by file name so that traversal order is
//! reproducible across runs and platforms.
//!
//! # Error policy
//!
//! The first traversal error (permission denied, vanished entry, missing
//! root, symlink loop) stops the walk of that root and is returned as
//! [`WalkError::Traversal`]. Entries visited before the error have already
//! been passed to the callback. A failing callback stops the walk too and
//! its error comes back as [`WalkError::Visit`].
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{WalkError, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let mut files = 0usize;
//! match walker.walk(|entry| -> Result<(), std::convert::Infallible> {
//!     if entry.is_file() {
//!         files += 1;
//!     }
//!     Ok(())
//! }) {
//!     Ok(visited) => println!("{visited} entries, {files} files"),
//!     Err(WalkError::Traversal(e)) => eprintln!("Warning: {e}"),
//!     Err(WalkError::Visit(never)) => match never {},
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use super::{EntryKind, ScanError, WalkEntry, WalkerConfig};

/// Why a walk stopped early.
#[derive(thiserror::Error, Debug)]
pub enum WalkError<E> {
    /// The filesystem traversal itself failed.
    #[error(transparent)]
    Traversal(#[from] ScanError),

    /// The per-entry callback returned an error.
    #[error(transparent)]
    Visit(E),
}

/// Directory walker for sequential file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupescan::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Walk the tree, calling `visit` for every entry including directories.
    ///
    /// Returns the number of entries visited on success.
    ///
    /// # Errors
    ///
    /// See the module-level error policy.
    pub fn walk<F, E>(&self, mut visit: F) -> Result<usize, WalkError<E>>
    where
        F: FnMut(&WalkEntry) -> Result<(), E>,
    {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        let mut visited = 0usize;
        for entry_result in walk_dir {
            let entry = entry_result.map_err(|e| self.convert_error(e))?;

            let metadata = entry.metadata().map_err(|e| self.convert_error(e))?;
            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_symlink() {
                EntryKind::Symlink
            } else {
                EntryKind::Other
            };

            let depth = entry.depth();
            let walk_entry = WalkEntry {
                path: entry.into_path(),
                kind,
                size: metadata.len(),
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                depth,
            };

            visit(&walk_entry).map_err(WalkError::Visit)?;
            visited += 1;
        }

        Ok(visited)
    }

    /// Convert a walkdir error into a [`ScanError`], logging it at debug level.
    ///
    /// The caller decides whether the error is worth a warning.
    fn convert_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if error.loop_ancestor().is_some() {
            log::debug!("Symlink loop at {}", path.display());
            return ScanError::Loop(path);
        }

        match error.into_io_error() {
            Some(io) => match io.kind() {
                std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path),
                std::io::ErrorKind::NotFound => {
                    log::debug!("Entry not found (may have been deleted): {}", path.display());
                    ScanError::NotFound(path)
                }
                _ => ScanError::Io { path, source: io },
            },
            None => ScanError::Io {
                path,
                source: std::io::Error::other("unknown traversal error"),
            },
        }
    }
}
