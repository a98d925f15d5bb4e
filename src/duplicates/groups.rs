//! Duplicate grouping by content fingerprint.
//!
//! # Overview
//!
//! Records are partitioned by fingerprint. Only fingerprints shared by two
//! or more records form a [`DuplicateGroup`]. Groups come out in the order
//! their fingerprint first appears in the input, and members keep their
//! input order, so the result is stable for a given scan.
//!
//! # Example
//!
//! ```
//! use chrono::Local;
//! use dupedetect::duplicates::find_duplicates;
//! use dupedetect::scanner::FileRecord;
//! use std::path::PathBuf;
//!
//! let now = Local::now();
//! let records = vec![
//!     FileRecord::new(PathBuf::from("/a"), "aa", 1, now),
//!     FileRecord::new(PathBuf::from("/b"), "bb", 1, now),
//!     FileRecord::new(PathBuf::from("/c"), "aa", 1, now),
//! ];
//!
//! let dupes = find_duplicates(&records);
//! assert_eq!(dupes.len(), 2);
//! assert!(dupes.iter().all(|r| r.fingerprint() == "aa"));
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::FileRecord;

/// All records sharing one fingerprint (two or more).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Shared content fingerprint
    pub fingerprint: String,
    /// Members, in input order
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(FileRecord::size).sum()
    }

    /// Space taken by every copy but one.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        match self.files.first() {
            Some(first) => self.total_size().saturating_sub(first.size()),
            None => 0,
        }
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path().to_path_buf()).collect()
    }
}

/// Partition `records` by fingerprint, keeping only groups of 2+.
#[must_use]
pub fn group_by_fingerprint(records: &[FileRecord]) -> Vec<DuplicateGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for record in records {
        let slot = *index.entry(record.fingerprint()).or_insert_with(|| {
            groups.push(DuplicateGroup {
                fingerprint: record.fingerprint().to_string(),
                files: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].files.push(record.clone());
    }

    groups.retain(|g| g.len() > 1);

    log::debug!(
        "{} records -> {} duplicate groups",
        records.len(),
        groups.len()
    );

    groups
}

/// Every record whose fingerprint is shared with at least one other record.
///
/// All members of a group are returned, not just the extra copies. The
/// input is not modified.
#[must_use]
pub fn find_duplicates(records: &[FileRecord]) -> Vec<FileRecord> {
    group_by_fingerprint(records)
        .into_iter()
        .flat_map(|g| g.files)
        .collect()
}

/// Totals over a set of duplicate groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateSummary {
    /// Number of groups
    pub groups: usize,
    /// Number of records across all groups
    pub files: usize,
    /// Bytes that removing all but one copy per group would free
    pub reclaimable: u64,
}

impl DuplicateSummary {
    /// Compute totals for `groups`.
    #[must_use]
    pub fn from_groups(groups: &[DuplicateGroup]) -> Self {
        Self {
            groups: groups.len(),
            files: groups.iter().map(DuplicateGroup::len).sum(),
            reclaimable: groups.iter().map(DuplicateGroup::wasted_space).sum(),
        }
    }
}
