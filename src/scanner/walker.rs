//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting the metadata needed to build
//! [`FileRecord`](super::FileRecord)s.
//!
//! # Features
//!
//! - Serial traversal, children sorted by file name, so the output order
//!   is stable for a given filesystem
//! - Hidden files and empty files are included
//! - Symlinks are skipped unless `follow_symlinks` is set. When they are
//!   followed, each target is yielded once, under the first path that
//!   reaches it
//! - Unreadable subdirectories are yielded as errors and the walk continues
//!
//! # Example
//!
//! ```no_run
//! use dupedetect::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use jwalk::{Parallelism, WalkDir};

use super::{creation_time, ScanError, WalkerConfig};

/// A regular file found by the walk, not yet hashed.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Creation time (mtime where unavailable)
    pub created_at: DateTime<Local>,
}

/// Directory walker for file discovery.
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
    /// Relative roots are made absolute against the current directory so
    /// every yielded path is absolute.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        let root = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self { root, config }
    }

    /// The absolute root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that the root exists, is a directory and can be listed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the root does not exist
    /// - `NotADirectory` if the root is a file
    /// - `PermissionDenied` / `Io` if the root cannot be listed
    pub fn validate_root(&self) -> Result<(), ScanError> {
        let metadata = fs::metadata(&self.root).map_err(|e| ScanError::from_io(&self.root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }
        fs::read_dir(&self.root).map_err(|e| ScanError::from_io(&self.root, e))?;
        Ok(())
    }

    /// Walk the directory tree, yielding regular files.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<DiscoveredFile, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(false)
            .parallelism(Parallelism::Serial)
            .sort(true);
        let mut seen_targets: HashSet<PathBuf> = HashSet::new();

        walk_dir.into_iter().filter_map(move |entry_result| match entry_result {
            Ok(entry) => {
                let path = entry.path();
                let file_type = entry.file_type();

                if file_type.is_dir() {
                    return None;
                }

                let is_symlink = file_type.is_symlink();
                if is_symlink && !self.config.follow_symlinks {
                    log::trace!("Skipping symlink: {}", path.display());
                    return None;
                }

                let metadata = if self.config.follow_symlinks {
                    fs::metadata(&path)
                } else {
                    fs::symlink_metadata(&path)
                };

                match metadata {
                    Ok(m) => {
                        let file = Self::process_file_entry(path, &m)?;
                        if self.config.follow_symlinks
                            && !Self::first_visit(&mut seen_targets, &file.path)
                        {
                            return None;
                        }
                        Some(Ok(file))
                    }
                    Err(e) => Some(Err(self.handle_io_error(&path, e))),
                }
            }
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                log::warn!("Walker error for {}: {}", path.display(), e);
                Some(Err(ScanError::Io {
                    path,
                    source: std::io::Error::other(e.to_string()),
                }))
            }
        })
    }

    /// Build a [`DiscoveredFile`] if the entry is a regular file.
    fn process_file_entry(path: PathBuf, metadata: &Metadata) -> Option<DiscoveredFile> {
        if !metadata.is_file() {
            log::trace!("Skipping non-regular file: {}", path.display());
            return None;
        }

        Some(DiscoveredFile {
            path,
            size: metadata.len(),
            created_at: creation_time(metadata),
        })
    }

    /// Record the canonical target of `path`. False if another path
    /// already reached the same file, so a link and its target never both
    /// become records.
    fn first_visit(seen: &mut HashSet<PathBuf>, path: &Path) -> bool {
        match fs::canonicalize(path) {
            Ok(target) => {
                if seen.insert(target) {
                    true
                } else {
                    log::debug!("Skipping {}: file already reached", path.display());
                    false
                }
            }
            Err(e) => {
                log::debug!("Cannot canonicalize {}: {}", path.display(), e);
                true
            }
        }
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        match error.kind() {
            std::io::ErrorKind::NotFound => {
                log::debug!("File not found (may have been deleted): {}", path.display());
            }
            _ => log::warn!("I/O error for {}: {}", path.display(), error),
        }
        ScanError::from_io(path, error)
    }
}
