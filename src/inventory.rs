//! File inventory construction.
//!
//! # Overview
//!
//! The [`InventoryBuilder`] drives a [`Walker`] over every root in the
//! order given, fingerprints each regular file it meets (directly or through
//! a symlink), and collects the results into an [`Inventory`]: a flat,
//! ordered list of [`FileRecord`]s.
//!
//! # Error policy
//!
//! - A traversal error ends the walk of the current root only. It is
//!   logged, recorded in [`ScanStats`], and the next root is processed.
//! - A fingerprint error aborts the whole build with
//!   [`InventoryError::Hash`], unless `skip_unreadable` is set, in which
//!   case the file is logged and left out of the inventory.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::inventory::{InventoryBuilder, InventoryConfig};
//! use std::path::PathBuf;
//!
//! let builder = InventoryBuilder::new(InventoryConfig::default());
//! let (inventory, stats) = builder
//!     .build(&[PathBuf::from("/data/a"), PathBuf::from("/data/b")])
//!     .unwrap();
//! println!("{} files, {} traversal errors", inventory.len(), stats.traversal_errors.len());
//! ```

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::scanner::{
    EntryKind, HashError, Hasher, ScanError, WalkEntry, WalkError, Walker, WalkerConfig,
};

/// One discovered regular file.
///
/// Field order and names match the report format exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileRecord {
    /// Byte length at scan time
    pub size: u64,
    /// Modification time at scan time
    pub last_modified: DateTime<Local>,
    /// Base name of the path
    pub filename: String,
    /// Full path as visited
    pub path: String,
    /// Lowercase hex SHA-256 of the content at read time
    pub checksum: String,
}

impl FileRecord {
    /// Build a record from a visited path and its metadata.
    ///
    /// The filename falls back to the whole path when the path has no
    /// final component (e.g. `/` or `..`).
    #[must_use]
    pub fn new(path: &Path, size: u64, modified: SystemTime, checksum: String) -> Self {
        let path_str = path.to_string_lossy().into_owned();
        let filename = path
            .file_name()
            .map_or_else(|| path_str.clone(), |n| n.to_string_lossy().into_owned());

        Self {
            size,
            last_modified: DateTime::<Local>::from(modified),
            filename,
            path: path_str,
            checksum,
        }
    }
}

/// Ordered sequence of file records, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    records: Vec<FileRecord>,
}

impl Inventory {
    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the inventory holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    /// Borrow the records as a slice.
    #[must_use]
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

}

impl From<Vec<FileRecord>> for Inventory {
    fn from(records: Vec<FileRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Counters collected while building an inventory.
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Number of roots requested
    pub roots: usize,
    /// Roots whose walk ended with a traversal error
    pub traversal_errors: Vec<ScanError>,
    /// Regular files recorded
    pub files: usize,
    /// Total bytes of recorded files
    pub bytes: u64,
    /// Entries skipped as non-regular (special files, dangling or directory links)
    pub skipped_entries: usize,
    /// Files left out because they could not be read (lenient mode only)
    pub unreadable_files: Vec<HashError>,
}

/// Errors that abort inventory construction.
#[derive(thiserror::Error, Debug)]
pub enum InventoryError {
    /// A file could not be fingerprinted.
    #[error("unable to compute file checksum: {0}")]
    Hash(#[from] HashError),

    /// No roots were supplied.
    #[error("no root paths to scan")]
    NoRoots,
}

/// Configuration for the inventory builder.
#[derive(Debug, Clone, Default)]
pub struct InventoryConfig {
    /// Walker configuration used for every root.
    pub walker_config: WalkerConfig,
    /// Treat unreadable files as recoverable instead of fatal.
    pub skip_unreadable: bool,
}

impl InventoryConfig {
    /// Set whether unreadable files are skipped instead of aborting.
    #[must_use]
    pub fn with_skip_unreadable(mut self, skip: bool) -> Self {
        self.skip_unreadable = skip;
        self
    }

    /// Set whether symbolic links are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.walker_config.follow_symlinks = follow;
        self
    }
}

/// Walks roots and fingerprints files into an [`Inventory`].
#[derive(Debug, Default)]
pub struct InventoryBuilder {
    config: InventoryConfig,
    hasher: Hasher,
}

impl InventoryBuilder {
    /// Create a builder with the given configuration.
    #[must_use]
    pub fn new(config: InventoryConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Build the inventory for `roots`, walked in the order given.
    ///
    /// Repeated or overlapping roots are walked again and produce repeated
    /// records.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NoRoots`] for an empty root list and
    /// [`InventoryError::Hash`] when a file cannot be fingerprinted in
    /// strict mode.
    pub fn build(&self, roots: &[PathBuf]) -> Result<(Inventory, ScanStats), InventoryError> {
        if roots.is_empty() {
            return Err(InventoryError::NoRoots);
        }

        let mut records = Vec::new();
        let mut stats = ScanStats {
            roots: roots.len(),
            ..ScanStats::default()
        };

        for root in roots {
            log::info!("Scanning {}", root.display());
            let walker = Walker::new(root, self.config.walker_config.clone());

            match walker.walk(|entry| self.visit(entry, &mut records, &mut stats)) {
                Ok(visited) => {
                    log::debug!("Visited {} entries under {}", visited, root.display());
                }
                Err(WalkError::Traversal(e)) => {
                    log::warn!("Error while scanning {}: {}", root.display(), e);
                    stats.traversal_errors.push(e);
                }
                Err(WalkError::Visit(e)) => return Err(e),
            }
        }

        Ok((Inventory::from(records), stats))
    }

    /// Handle a single walked entry.
    fn visit(
        &self,
        entry: &WalkEntry,
        records: &mut Vec<FileRecord>,
        stats: &mut ScanStats,
    ) -> Result<(), InventoryError> {
        let (size, modified) = match entry.kind {
            EntryKind::Directory => return Ok(()),
            EntryKind::File => (entry.size, entry.modified),
            EntryKind::Symlink => match link_target_file(&entry.path) {
                Some(target) => target,
                None => {
                    log::debug!(
                        "Skipping link to non-regular target: {}",
                        entry.path.display()
                    );
                    stats.skipped_entries += 1;
                    return Ok(());
                }
            },
            EntryKind::Other => {
                log::debug!("Skipping non-regular entry: {}", entry.path.display());
                stats.skipped_entries += 1;
                return Ok(());
            }
        };

        let checksum = match self.hasher.checksum(&entry.path) {
            Ok(checksum) => checksum,
            Err(e) if self.config.skip_unreadable => {
                log::warn!("Skipping unreadable file: {}", e);
                stats.unreadable_files.push(e);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        stats.files += 1;
        stats.bytes += size;
        records.push(FileRecord::new(&entry.path, size, modified, checksum));
        Ok(())
    }
}

/// Size and modification time of a link's target, if it is a regular file.
///
/// Dangling links and links to directories or special files yield `None`.
fn link_target_file(path: &Path) -> Option<(u64, SystemTime)> {
    let metadata = std::fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    Some((metadata.len(), modified))
}
