//! MD5 file hasher with streaming support.
//!
//! # Overview
//! This module provides the [`Hasher`] struct for computing MD5 content
//! fingerprints. Files are read in fixed-size chunks, so memory use does not
//! grow with file size. MD5 is fast and more than enough to detect accidental
//! duplicates; it is not meant to resist deliberate collisions.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};

use super::HashError;

/// Read buffer size for streaming hashes (64 KiB).
pub const BUFFER_SIZE: usize = 64 * 1024;

/// Streaming MD5 file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: BUFFER_SIZE,
        }
    }

    /// Create a hasher with a custom read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Compute the fingerprint of the file at `path`.
    ///
    /// Returns the digest as a 32-character lowercase hex string.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file vanished
    /// - `PermissionDenied` if the file cannot be opened for reading
    /// - `Io` for any other read failure
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupedetect::scanner::Hasher;
    /// use std::path::Path;
    ///
    /// let hasher = Hasher::new();
    /// let fingerprint = hasher.hash(Path::new("Cargo.toml")).unwrap();
    /// assert_eq!(fingerprint.len(), 32);
    /// ```
    pub fn hash(&self, path: &Path) -> Result<String, HashError> {
        let file = File::open(path).map_err(|e| map_io_error(path, e))?;
        self.hash_reader(file).map_err(|e| map_io_error(path, e))
    }

    /// Compute the fingerprint of everything `reader` yields.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying reader.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<String> {
        let mut digest = Md5::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            digest.update(&buffer[..read]);
        }

        Ok(format!("{:x}", digest.finalize()))
    }
}

fn map_io_error(path: &Path, error: io::Error) -> HashError {
    match error.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
