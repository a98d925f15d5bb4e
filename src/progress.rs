//! Progress reporting for the scan and delete phases.
//!
//! The pipeline never formats text itself. It talks to a [`ScanObserver`]
//! while scanning and a [`ResolveObserver`] while deleting. Two
//! implementations are provided:
//!
//! - [`ConsoleReporter`]: line-oriented terminal output with an indicatif
//!   spinner during enumeration and colored DELETING/KEEPING lines
//! - [`NullReporter`]: ignores everything (tests, library use)

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use yansi::Paint;

use crate::actions::DeleteError;
use crate::scanner::{FileRecord, ScanError};

/// Observer for scan events.
pub trait ScanObserver {
    /// The root could not be enumerated; the scan will return nothing.
    fn on_root_error(&self, error: &ScanError);

    /// Enumeration of `root` is starting.
    fn on_walk_start(&self, _root: &Path) {}

    /// Enumeration finished with `total` regular files found.
    fn on_walk_end(&self, total: usize);

    /// Periodic hashing progress.
    ///
    /// # Arguments
    ///
    /// * `current` - Number of files processed so far (1-based)
    /// * `total` - Number of files found
    /// * `path` - File being processed
    fn on_progress(&self, current: usize, total: usize, path: &Path);

    /// A single entry was skipped.
    fn on_warning(&self, error: &ScanError);

    /// Hashing finished with `hashed` records built.
    fn on_hash_end(&self, _hashed: usize) {}
}

/// Observer for deletion events.
pub trait ResolveObserver {
    /// `deleted` was removed (or was already gone) in favour of `kept`.
    fn on_deleted(&self, deleted: &FileRecord, kept: &FileRecord);

    /// Removing `record` failed; other deletions continue.
    fn on_delete_failed(&self, record: &FileRecord, error: &DeleteError);

    /// `record` shares the keeper's creation time and is left alone.
    fn on_spared(&self, _record: &FileRecord, _kept: &FileRecord) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ScanObserver for NullReporter {
    fn on_root_error(&self, _error: &ScanError) {}
    fn on_walk_end(&self, _total: usize) {}
    fn on_progress(&self, _current: usize, _total: usize, _path: &Path) {}
    fn on_warning(&self, _error: &ScanError) {}
}

impl ResolveObserver for NullReporter {
    fn on_deleted(&self, _deleted: &FileRecord, _kept: &FileRecord) {}
    fn on_delete_failed(&self, _record: &FileRecord, _error: &DeleteError) {}
}

/// Terminal reporter.
pub struct ConsoleReporter {
    walking: Mutex<Option<ProgressBar>>,
    interval: usize,
    quiet: bool,
}

impl ConsoleReporter {
    /// Create a console reporter. With `quiet` set, only warnings and
    /// failures are printed. `interval` is only used for the banner.
    #[must_use]
    pub fn new(quiet: bool, interval: usize) -> Self {
        Self {
            walking: Mutex::new(None),
            interval,
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    /// Print a line without tearing an active spinner.
    fn println(&self, line: String) {
        match self.walking.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(pb) => pb.println(line),
                None => println!("{line}"),
            },
            Err(_) => println!("{line}"),
        }
    }

    fn finish_spinner(&self) {
        if let Ok(mut guard) = self.walking.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ScanObserver for ConsoleReporter {
    fn on_root_error(&self, error: &ScanError) {
        eprintln!("{}", error.to_string().red());
    }

    fn on_walk_start(&self, root: &Path) {
        if self.quiet {
            return;
        }
        println!("Scanning directory and sub dirs");
        if self.interval > 0 {
            println!("Updates per {} file(s)", self.interval);
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::walking_style());
        pb.set_message(format!("Walking {}", root.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut guard) = self.walking.lock() {
            *guard = Some(pb);
        }
    }

    fn on_walk_end(&self, total: usize) {
        self.finish_spinner();
        if self.quiet {
            return;
        }
        println!("Files found: {total}");
        println!("Now Building hash database");
    }

    fn on_progress(&self, current: usize, total: usize, path: &Path) {
        if self.quiet {
            return;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.println(format!(" {current}/{total} - {name}"));
    }

    fn on_warning(&self, error: &ScanError) {
        self.println(format!("{} {}", "warning:".yellow(), error));
    }

    fn on_hash_end(&self, _hashed: usize) {
        if !self.quiet {
            println!("Done Hashing");
        }
    }
}

impl ResolveObserver for ConsoleReporter {
    fn on_deleted(&self, deleted: &FileRecord, kept: &FileRecord) {
        if self.quiet {
            return;
        }
        println!(
            "{}",
            format!(
                "DELETING {} --- {}",
                format_timestamp(deleted.created_at()),
                deleted.path().display()
            )
            .red()
        );
        println!(
            "{}",
            format!(
                " KEEPING {} --- {}",
                format_timestamp(kept.created_at()),
                kept.path().display()
            )
            .green()
        );
    }

    fn on_delete_failed(&self, record: &FileRecord, error: &DeleteError) {
        eprintln!(
            "{}",
            format!("FAILED   {} --- {}", record.path().display(), error).red()
        );
    }

    fn on_spared(&self, record: &FileRecord, kept: &FileRecord) {
        log::info!(
            "Not deleting {}: same creation time as kept {}",
            record.path().display(),
            kept.path().display()
        );
    }
}

/// Render a timestamp for console output.
#[must_use]
pub fn format_timestamp(time: DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}
