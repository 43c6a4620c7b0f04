//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Counting records per checksum
//! - Filtering the inventory down to groups with 2+ members

pub mod groups;

pub use groups::{count_by_checksum, filter_duplicates, find_duplicates, DuplicateGroups, DuplicateIndex};
