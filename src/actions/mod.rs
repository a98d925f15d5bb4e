//! File actions module.
//!
//! Currently a single action: permanent deletion of a duplicate.
//!
//! ```no_run
//! use dupedetect::actions::delete_file;
//! use std::path::Path;
//!
//! let outcome = delete_file(Path::new("/path/to/duplicate.txt"));
//! ```

pub mod delete;

pub use delete::{delete_file, DeleteError, DeleteOutcome};
