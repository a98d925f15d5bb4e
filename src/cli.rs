//! Command-line interface definitions for dupedetect.
//!
//! Every argument is optional. Whatever is not given on the command line
//! is asked for interactively, as the tool always did:
//!
//! ```bash
//! # Fully interactive: prompts for the path, then for the action key
//! dupedetect
//!
//! # Scan a directory and write Dupelist.json without prompting
//! dupedetect ~/Pictures --action export
//!
//! # Delete newer copies, also removing copies created at the same instant
//! dupedetect ~/Pictures --action delete --tie-policy path-only
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::duplicates::TiePolicy;

/// Find duplicate files by content hash.
///
/// Scans a directory tree, fingerprints every file with MD5 and groups
/// identical files. The duplicate list can be exported to JSON, or every
/// copy but the oldest can be deleted.
#[derive(Debug, Parser)]
#[command(name = "dupedetect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Directory to scan (prompted for when omitted)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// What to do with the duplicates (prompted for when omitted)
    #[arg(short, long, value_enum)]
    pub action: Option<Action>,

    /// Where the export action writes the list [default: Dupelist.json]
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// How copies created at the same instant as the kept file are treated
    #[arg(long, value_enum)]
    pub tie_policy: Option<TiePolicy>,

    /// Follow symbolic links during scan
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Print a progress line every N hashed files (0 disables)
    #[arg(long, value_name = "N")]
    pub progress_interval: Option<usize>,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    pub save_config: bool,
}

/// Operation to run on the duplicate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Write the duplicate list to a JSON file
    Export,
    /// Keep the oldest copy of each file and delete the rest
    Delete,
    /// Do nothing
    Quit,
}

impl Action {
    /// Map a menu keypress to an action.
    ///
    /// `S` (save) exports, `D` deletes, anything else quits.
    #[must_use]
    pub fn from_key(key: char) -> Self {
        match key.to_ascii_lowercase() {
            's' => Self::Export,
            'd' => Self::Delete,
            _ => Self::Quit,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Export => write!(f, "export"),
            Action::Delete => write!(f, "delete"),
            Action::Quit => write!(f, "quit"),
        }
    }
}
