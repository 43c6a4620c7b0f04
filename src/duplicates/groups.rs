//! Checksum-based duplicate grouping.
//!
//! # Overview
//!
//! Grouping runs in two passes over the [`Inventory`]:
//!
//! 1. [`count_by_checksum`] counts records per checksum ([`DuplicateIndex`]).
//! 2. [`filter_duplicates`] walks the inventory again in order and keeps
//!    only records whose checksum was counted at least twice.
//!
//! Member order inside a group is inventory order. Group keys are kept in
//! a `BTreeMap`, so serialized output is ordered by checksum.
//!
//! # Example
//!
//! ```
//! use dupescan::duplicates::find_duplicates;
//! use dupescan::inventory::{FileRecord, Inventory};
//! use std::path::Path;
//! use std::time::SystemTime;
//!
//! let now = SystemTime::now();
//! let inventory = Inventory::from(vec![
//!     FileRecord::new(Path::new("/a/x.txt"), 5, now, "aa".into()),
//!     FileRecord::new(Path::new("/b/y.txt"), 5, now, "aa".into()),
//!     FileRecord::new(Path::new("/b/z.txt"), 3, now, "bb".into()),
//! ]);
//!
//! let groups = find_duplicates(&inventory);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups.get("aa").unwrap().len(), 2);
//! assert!(groups.get("bb").is_none());
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::inventory::{FileRecord, Inventory};

/// Number of records per checksum.
pub type DuplicateIndex = HashMap<String, usize>;

/// Checksum → records, restricted to checksums shared by 2+ records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateGroups {
    groups: BTreeMap<String, Vec<FileRecord>>,
}

impl DuplicateGroups {
    /// Number of duplicate groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Records sharing `checksum`, if it is a duplicate group.
    #[must_use]
    pub fn get(&self, checksum: &str) -> Option<&[FileRecord]> {
        self.groups.get(checksum).map(Vec::as_slice)
    }

    /// Iterate groups in checksum order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FileRecord])> {
        self.groups
            .iter()
            .map(|(checksum, files)| (checksum.as_str(), files.as_slice()))
    }

    /// Total number of records across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Bytes that removing all but one copy per group would free.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.groups
            .values()
            .filter_map(|files| {
                let first = files.first()?;
                Some(first.size * (files.len() as u64 - 1))
            })
            .sum()
    }
}

/// Count records per checksum in a single pass.
#[must_use]
pub fn count_by_checksum(inventory: &Inventory) -> DuplicateIndex {
    let mut counts = DuplicateIndex::new();
    for record in inventory {
        *counts.entry(record.checksum.clone()).or_insert(0) += 1;
    }
    counts
}

/// Keep records whose checksum count is at least 2, preserving inventory order.
#[must_use]
pub fn filter_duplicates(inventory: &Inventory, counts: &DuplicateIndex) -> DuplicateGroups {
    let mut groups: BTreeMap<String, Vec<FileRecord>> = BTreeMap::new();
    for record in inventory {
        if counts.get(&record.checksum).copied().unwrap_or(0) > 1 {
            groups
                .entry(record.checksum.clone())
                .or_default()
                .push(record.clone());
        }
    }
    DuplicateGroups { groups }
}

/// Count and filter in one call.
#[must_use]
pub fn find_duplicates(inventory: &Inventory) -> DuplicateGroups {
    let counts = count_by_checksum(inventory);
    let groups = filter_duplicates(inventory, &counts);
    log::debug!(
        "{} distinct checksums, {} duplicate group(s)",
        counts.len(),
        groups.len()
    );
    groups
}
