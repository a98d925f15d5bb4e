//! Keep/delete decisions for duplicate groups.
//!
//! # Overview
//!
//! For every fingerprint the oldest record (by creation time) is kept and
//! the other copies are deleted. Deciding and deleting are split:
//!
//! - [`plan`] is pure and returns a [`ResolutionPlan`]
//! - [`resolve`] computes the plan and carries out the deletions
//!
//! # Ties
//!
//! Records are stably sorted by creation time, so among records created at
//! the same instant the one scanned first becomes the keeper.
//!
//! Under [`TiePolicy::Literal`] a copy is only deleted when its creation
//! time differs from the keeper's. Copies created at exactly the same
//! instant as the keeper are *spared*: left on disk and listed in
//! [`ResolutionPlan::spared`]. This mirrors the long-standing behavior of
//! the tool. [`TiePolicy::PathOnly`] deletes every copy whose path differs
//! from the keeper's, which removes those leftovers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::actions::{delete_file, DeleteError, DeleteOutcome};
use crate::progress::ResolveObserver;
use crate::scanner::FileRecord;

/// Rule deciding whether a non-keeper copy is deleted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TiePolicy {
    /// Delete only copies whose creation time and path both differ from
    /// the keeper's.
    #[default]
    Literal,
    /// Delete every copy whose path differs from the keeper's.
    PathOnly,
}

impl TiePolicy {
    /// Should `candidate` be deleted in favour of `keep`?
    ///
    /// Both records must share a fingerprint.
    #[must_use]
    pub fn should_delete(self, keep: &FileRecord, candidate: &FileRecord) -> bool {
        debug_assert_eq!(keep.fingerprint(), candidate.fingerprint());
        if keep.path() == candidate.path() {
            return false;
        }
        match self {
            Self::Literal => keep.created_at() != candidate.created_at(),
            Self::PathOnly => true,
        }
    }
}

impl std::fmt::Display for TiePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal => write!(f, "literal"),
            Self::PathOnly => write!(f, "path-only"),
        }
    }
}

/// One copy to delete, paired with the record that survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDeletion {
    /// Copy to remove
    pub delete: FileRecord,
    /// Keeper of the same group
    pub keep: FileRecord,
}

/// Decisions for a set of duplicates. Nothing has touched the disk yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionPlan {
    /// One keeper per fingerprint, oldest first
    pub kept: Vec<FileRecord>,
    /// Copies to remove, grouped by keeper, oldest first within a group
    pub deletions: Vec<PlannedDeletion>,
    /// Copies left alone because they tie with their keeper
    pub spared: Vec<PlannedDeletion>,
}

/// Decide which record to keep and which to delete for every fingerprint.
///
/// Pure: no I/O, `duplicates` is not modified.
#[must_use]
pub fn plan(duplicates: &[FileRecord], policy: TiePolicy) -> ResolutionPlan {
    let mut sorted = duplicates.to_vec();
    sorted.sort_by_key(FileRecord::created_at);

    let mut seen: HashSet<&str> = HashSet::new();
    let kept: Vec<FileRecord> = sorted
        .iter()
        .filter(|r| seen.insert(r.fingerprint()))
        .cloned()
        .collect();

    let mut result = ResolutionPlan::default();
    for keep in &kept {
        for candidate in sorted
            .iter()
            .filter(|r| r.fingerprint() == keep.fingerprint() && r.path() != keep.path())
        {
            let entry = PlannedDeletion {
                delete: candidate.clone(),
                keep: keep.clone(),
            };
            if policy.should_delete(keep, candidate) {
                result.deletions.push(entry);
            } else {
                result.spared.push(entry);
            }
        }
    }
    result.kept = kept;

    log::debug!(
        "Resolution plan ({}): keep {}, delete {}, spare {}",
        policy,
        result.kept.len(),
        result.deletions.len(),
        result.spared.len()
    );

    result
}

/// What [`resolve`] did.
#[derive(Debug, Default)]
pub struct ResolveReport {
    /// One keeper per fingerprint
    pub kept: Vec<FileRecord>,
    /// Copies that no longer exist: removed now or already missing
    pub deleted: Vec<FileRecord>,
    /// How many of `deleted` were missing before we got to them
    pub already_gone: usize,
    /// Copies left alone because they tie with their keeper
    pub spared: Vec<FileRecord>,
    /// Copies that could not be removed
    pub failures: Vec<(FileRecord, DeleteError)>,
    /// Bytes actually freed
    pub bytes_freed: u64,
}

impl ResolveReport {
    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let freed = bytesize::ByteSize(self.bytes_freed);
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), kept {}, freed {}",
                self.deleted.len(),
                self.kept.len(),
                freed
            )
        } else {
            format!(
                "Deleted {} file(s), kept {}, {} failed, freed {}",
                self.deleted.len(),
                self.kept.len(),
                self.failures.len(),
                freed
            )
        }
    }
}

/// Keep the oldest copy of every fingerprint and delete the rest.
///
/// Each deletion is independent: a failure is reported to `observer`,
/// recorded in the report, and the remaining deletions still run.
pub fn resolve(
    duplicates: &[FileRecord],
    policy: TiePolicy,
    observer: &dyn ResolveObserver,
) -> ResolveReport {
    let plan = plan(duplicates, policy);
    let mut report = ResolveReport::default();

    for PlannedDeletion { delete, keep } in plan.spared {
        observer.on_spared(&delete, &keep);
        report.spared.push(delete);
    }

    for PlannedDeletion { delete, keep } in plan.deletions {
        match delete_file(delete.path()) {
            Ok(outcome) => {
                match outcome {
                    DeleteOutcome::Deleted { size } => report.bytes_freed += size,
                    DeleteOutcome::AlreadyGone => report.already_gone += 1,
                }
                observer.on_deleted(&delete, &keep);
                report.deleted.push(delete);
            }
            Err(e) => {
                log::warn!("Failed to delete {}: {}", delete.path().display(), e);
                observer.on_delete_failed(&delete, &e);
                report.failures.push((delete, e));
            }
        }
    }

    report.kept = plan.kept;
    log::info!("{}", report.summary());
    report
}
