//! Output formatters for duplicate scan results.
//!
//! Only JSON is supported: the duplicate list is written as
//! `Dupelist.json` for later review or scripting.

pub mod json;

pub use json::{export, load, ExportError, JsonRecord, DEFAULT_EXPORT_FILE};
