//! Permanent file deletion.
//!
//! # Overview
//!
//! Duplicates are removed with [`std::fs::remove_file`]: there is no trash
//! and no undo. A file that is already gone when its turn comes counts as
//! resolved, not as a failure.
//!
//! # Example
//!
//! ```no_run
//! use dupedetect::actions::delete::{delete_file, DeleteOutcome};
//! use std::path::Path;
//!
//! match delete_file(Path::new("/path/to/duplicate.txt")) {
//!     Ok(DeleteOutcome::Deleted { size }) => println!("Freed {} bytes", size),
//!     Ok(DeleteOutcome::AlreadyGone) => println!("Nothing to do"),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// Permission denied when attempting to delete.
    #[error("permission denied: {0} - try running with elevated privileges")]
    PermissionDenied(PathBuf),

    /// The path exists but is not a regular file any more.
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotAFile(p) | Self::Io { path: p, .. } => p,
        }
    }

    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// What happened to a file passed to [`delete_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The file was removed.
    Deleted {
        /// Size of the removed file in bytes.
        size: u64,
    },
    /// Nothing existed at the path.
    AlreadyGone,
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `PermissionDenied` if deletion is not allowed
/// - `NotAFile` if the path now names a directory or other non-file
/// - `Io` for any other failure
pub fn delete_file(path: &Path) -> Result<DeleteOutcome, DeleteError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("Already gone: {}", path.display());
            return Ok(DeleteOutcome::AlreadyGone);
        }
        Err(e) => return Err(DeleteError::from_io(path, e)),
    };

    if metadata.is_dir() {
        return Err(DeleteError::NotAFile(path.to_path_buf()));
    }

    let size = metadata.len();

    match fs::remove_file(path) {
        Ok(()) => {
            log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);
            Ok(DeleteOutcome::Deleted { size })
        }
        // Lost a race with something else removing it.
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(DeleteOutcome::AlreadyGone),
        Err(e) => {
            log::error!("Permanent delete failed for {}: {}", path.display(), e);
            Err(DeleteError::from_io(path, e))
        }
    }
}
