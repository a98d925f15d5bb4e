//! JSON export of the duplicate list.
//!
//! # Output Schema
//!
//! A flat, pretty-printed array with one object per duplicate file:
//!
//! ```json
//! [
//!   {
//!     "path": "/photos/a.jpg",
//!     "md5": "9dd4e461268c8034f5c8564e155c67a6",
//!     "size": 1024,
//!     "creation": "2021-03-04T05:06:07.123456789+01:00"
//!   }
//! ]
//! ```
//!
//! The file is written next to its destination under a temporary name and
//! renamed into place, so a failed export never leaves a truncated file.
//!
//! # Example
//!
//! ```no_run
//! use dupedetect::output::json::{export, load};
//! use dupedetect::scanner::FileRecord;
//! use std::path::Path;
//!
//! let records: Vec<FileRecord> = Vec::new();
//! export(&records, Path::new("Dupelist.json")).unwrap();
//! let back = load(Path::new("Dupelist.json")).unwrap();
//! assert!(back.is_empty());
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::scanner::FileRecord;

/// Default export file name, created in the working directory.
pub const DEFAULT_EXPORT_FILE: &str = "Dupelist.json";

/// Errors from writing or reading an export.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// The destination could not be created, written or read.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The records could not be encoded or decoded.
    #[error("JSON error for {path}: {source}")]
    Json {
        /// File involved
        path: PathBuf,
        /// The underlying serde_json error
        #[source]
        source: serde_json::Error,
    },

    /// A record's path cannot be written as a JSON string without loss.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

/// One exported duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRecord {
    /// Absolute path
    pub path: String,
    /// Lowercase hex MD5
    pub md5: String,
    /// Size in bytes
    pub size: u64,
    /// Creation time, RFC 3339
    pub creation: DateTime<Local>,
}

impl TryFrom<&FileRecord> for JsonRecord {
    type Error = ExportError;

    fn try_from(record: &FileRecord) -> Result<Self, Self::Error> {
        let path = record
            .path()
            .to_str()
            .ok_or_else(|| ExportError::NonUtf8Path(record.path().to_path_buf()))?;
        Ok(Self {
            path: path.to_string(),
            md5: record.fingerprint().to_string(),
            size: record.size(),
            creation: record.created_at(),
        })
    }
}

impl From<JsonRecord> for FileRecord {
    fn from(record: JsonRecord) -> Self {
        FileRecord::new(
            PathBuf::from(record.path),
            record.md5,
            record.size,
            record.creation,
        )
    }
}

/// Write `records` to `dest`, replacing any existing file.
///
/// # Errors
///
/// Returns `ExportError` if a path is not valid UTF-8, or if the file
/// cannot be created, written or moved into place. On failure the
/// destination is left untouched.
pub fn export(records: &[FileRecord], dest: &Path) -> Result<(), ExportError> {
    let rows = records
        .iter()
        .map(JsonRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let partial = partial_path(dest);

    let result = write_rows(&rows, &partial).and_then(|()| {
        fs::rename(&partial, dest).map_err(|source| ExportError::Io {
            path: dest.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&partial);
    } else {
        log::info!("Exported {} records to {}", rows.len(), dest.display());
    }
    result
}

/// Read an export back into records.
///
/// # Errors
///
/// Returns `ExportError` if the file cannot be read or is not a valid
/// export.
pub fn load(path: &Path) -> Result<Vec<FileRecord>, ExportError> {
    let content = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<JsonRecord> =
        serde_json::from_str(&content).map_err(|source| ExportError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(rows.into_iter().map(FileRecord::from).collect())
}

fn write_rows(rows: &[JsonRecord], path: &Path) -> Result<(), ExportError> {
    let io_err = |source: io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rows).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n").map_err(io_err)?;
    let file = writer.into_inner().map_err(|e| io_err(e.into_error()))?;
    file.sync_all().map_err(io_err)?;
    Ok(())
}

/// Sibling path used while writing.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_EXPORT_FILE.into());
    name.push(".partial");
    dest.with_file_name(name)
}
