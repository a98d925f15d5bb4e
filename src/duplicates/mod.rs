//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Grouping scanned records by content fingerprint
//! - Choosing a keeper per group and deleting the other copies

pub mod groups;
pub mod resolver;

pub use groups::{find_duplicates, group_by_fingerprint, DuplicateGroup, DuplicateSummary};
pub use resolver::{plan, resolve, PlannedDeletion, ResolutionPlan, ResolveReport, TiePolicy};
