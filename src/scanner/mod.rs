//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Deterministic directory walking using jwalk
//! - Content fingerprinting with MD5
//! - Building immutable [`FileRecord`] snapshots
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: MD5 file hashing (streaming)
//!
//! [`Scanner`] ties the two together: it enumerates the tree first, then
//! hashes each discovered file in order, reporting to a [`ScanObserver`].
//!
//! # Example
//!
//! ```no_run
//! use dupedetect::progress::NullReporter;
//! use dupedetect::scanner::{Scanner, WalkerConfig};
//! use std::path::Path;
//!
//! let scanner = Scanner::new(WalkerConfig::default());
//! let outcome = scanner.scan(Path::new("."), &NullReporter);
//! for record in &outcome.records {
//!     println!("{} {}", record.fingerprint(), record.path().display());
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::progress::ScanObserver;

// Re-export main types
pub use hasher::Hasher;
pub use walker::Walker;

/// Default number of files between progress notifications.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Snapshot of one scanned file.
///
/// Built once during a scan and never mutated afterwards. Later changes to
/// the file on disk are not reflected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    fingerprint: String,
    size: u64,
    created_at: DateTime<Local>,
}

impl FileRecord {
    /// Create a new record.
    ///
    /// # Arguments
    ///
    /// * `path` - Absolute path to the file
    /// * `fingerprint` - Lowercase hex digest of the file content
    /// * `size` - File size in bytes
    /// * `created_at` - Creation timestamp at scan time
    #[must_use]
    pub fn new(
        path: PathBuf,
        fingerprint: impl Into<String>,
        size: u64,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            path,
            fingerprint: fingerprint.into(),
            size,
            created_at,
        }
    }

    /// Absolute path to the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercase hex content digest.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Size in bytes at scan time.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Creation timestamp at scan time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }
}

/// Creation time of a file, falling back to mtime where the platform or
/// filesystem has no birth time.
#[must_use]
pub fn creation_time(metadata: &std::fs::Metadata) -> DateTime<Local> {
    let time = metadata
        .created()
        .or_else(|_| metadata.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH);
    DateTime::<Local>::from(time)
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Warning: May cause infinite loops with symlink cycles.
    pub follow_symlinks: bool,

    /// Report progress every this many hashed files.
    pub progress_interval: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl WalkerConfig {
    /// Enable or disable symlink following.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set the progress cadence. Zero disables progress lines.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file was found but could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Map an I/O error on `path` to the matching variant.
    pub(crate) fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Everything a scan produced.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Hashed files in walk order.
    pub records: Vec<FileRecord>,
    /// Per-entry failures that were skipped.
    pub errors: Vec<ScanError>,
    /// Set when the root itself could not be enumerated.
    pub root_error: Option<ScanError>,
    /// Number of regular files the walk discovered.
    pub files_found: usize,
}

impl ScanOutcome {
    /// True when the scan hit no errors at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.root_error.is_none()
    }
}

/// Walks a tree and hashes every regular file in it, one at a time.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: WalkerConfig,
    hasher: Hasher,
}

impl Scanner {
    /// Create a scanner with the given walk configuration.
    #[must_use]
    pub fn new(config: WalkerConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Scan `root` and return a record for every file that could be hashed.
    ///
    /// A root that cannot be enumerated yields an empty outcome with
    /// `root_error` set. Files that fail to hash are skipped, collected in
    /// `errors` and reported to the observer as warnings.
    pub fn scan(&self, root: &Path, observer: &dyn ScanObserver) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        let walker = Walker::new(root, self.config.clone());
        if let Err(e) = walker.validate_root() {
            log::warn!("Cannot scan {}: {}", root.display(), e);
            observer.on_root_error(&e);
            outcome.root_error = Some(e);
            return outcome;
        }

        observer.on_walk_start(root);
        let mut files = Vec::new();
        for entry in walker.walk() {
            match entry {
                Ok(file) => files.push(file),
                Err(e) => {
                    observer.on_warning(&e);
                    outcome.errors.push(e);
                }
            }
        }
        outcome.files_found = files.len();
        observer.on_walk_end(files.len());
        log::info!("Found {} files under {}", files.len(), root.display());

        let total = files.len();
        let interval = self.config.progress_interval;
        for (index, file) in files.into_iter().enumerate() {
            let count = index + 1;
            if interval > 0 && count % interval == 0 {
                observer.on_progress(count, total, &file.path);
            }

            match self.hasher.hash(&file.path) {
                Ok(fingerprint) => {
                    log::trace!("{} {}", fingerprint, file.path.display());
                    outcome.records.push(FileRecord::new(
                        file.path,
                        fingerprint,
                        file.size,
                        file.created_at,
                    ));
                }
                Err(e) => {
                    log::warn!("Skipping unreadable file: {}", e);
                    let e = ScanError::from(e);
                    observer.on_warning(&e);
                    outcome.errors.push(e);
                }
            }
        }
        observer.on_hash_end(outcome.records.len());

        outcome
    }
}
