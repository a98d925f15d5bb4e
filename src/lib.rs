//! dupedetect - duplicate file detector
//!
//! Scans a directory tree, fingerprints every file with MD5, and groups
//! files with identical content. The duplicate list can be exported to
//! `Dupelist.json`, or every copy except the oldest can be deleted.
//!
//! The pipeline is `scan -> find_duplicates -> export | resolve`:
//!
//! ```no_run
//! use dupedetect::duplicates::{find_duplicates, resolve, TiePolicy};
//! use dupedetect::progress::NullReporter;
//! use dupedetect::scanner::{Scanner, WalkerConfig};
//! use std::path::Path;
//!
//! let outcome = Scanner::new(WalkerConfig::default()).scan(Path::new("."), &NullReporter);
//! let duplicates = find_duplicates(&outcome.records);
//! let report = resolve(&duplicates, TiePolicy::Literal, &NullReporter);
//! println!("{}", report.summary());
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod scanner;

use std::io;

use anyhow::{Context, Result};
use bytesize::ByteSize;

use crate::cli::{Action, Cli};
use crate::config::Config;
use crate::duplicates::{group_by_fingerprint, resolve, DuplicateSummary};
use crate::error::ExitCode;
use crate::progress::ConsoleReporter;
use crate::scanner::{FileRecord, Scanner, WalkerConfig};

/// Run the application with parsed arguments.
///
/// Logging must already be initialized.
///
/// # Errors
///
/// Returns an error only when no path could be obtained or the terminal
/// could not be read. Scan, delete and export failures are reported and
/// turned into [`ExitCode::PartialSuccess`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    let config = effective_config(&cli);
    log::debug!("Effective config: {:?}", config);

    if cli.save_config {
        let path = config.save().context("failed to save config")?;
        println!("Saved config to {}", path.display());
        return Ok(ExitCode::Success);
    }

    let quiet = cli.quiet;
    let say = |line: &str| {
        if !quiet {
            println!("{line}");
        }
    };

    let root = match cli.path {
        Some(path) => path,
        None => prompt::read_path(&mut io::stdin().lock(), &mut io::stdout())
            .context("failed to read path")?
            .ok_or_else(|| anyhow::anyhow!("no path given"))?,
    };

    let reporter = ConsoleReporter::new(quiet, config.progress_interval);
    let walker_config = WalkerConfig::default()
        .with_follow_symlinks(config.follow_symlinks)
        .with_progress_interval(config.progress_interval);
    let outcome = Scanner::new(walker_config).scan(&root, &reporter);

    if outcome.root_error.is_some() {
        return Ok(ExitCode::PartialSuccess);
    }
    let mut partial = !outcome.is_clean();
    if partial {
        say(&format!("Skipped {} unreadable entries", outcome.errors.len()));
    }

    say("Detecting duplicates by hash");
    let groups = group_by_fingerprint(&outcome.records);
    let summary = DuplicateSummary::from_groups(&groups);
    let duplicates: Vec<FileRecord> = groups.into_iter().flat_map(|g| g.files).collect();
    say(&format!("Duplicates found: {}", duplicates.len()));
    if summary.groups > 0 {
        say(&format!(
            "{} groups, {} reclaimable",
            summary.groups,
            ByteSize(summary.reclaimable)
        ));
    }

    if duplicates.is_empty() {
        return Ok(ExitCode::NoDuplicates.or_partial(partial));
    }

    let interactive = cli.action.is_none();
    let action = match cli.action {
        Some(action) => action,
        None => {
            prompt::print_menu(&mut io::stdout())?;
            prompt::read_action().context("failed to read action key")?
        }
    };
    log::debug!("Action: {}", action);

    match action {
        Action::Export => {
            say("Saving dupelist");
            match output::export(&duplicates, &config.output_file) {
                Ok(()) => say(&format!(
                    "Wrote {} entries to {}",
                    duplicates.len(),
                    config.output_file.display()
                )),
                Err(e) => {
                    eprintln!("Export failed: {e}");
                    partial = true;
                }
            }
        }
        Action::Delete => {
            say("Deleting newer known dupes");
            let report = resolve(&duplicates, config.tie_policy, &reporter);
            if !report.spared.is_empty() {
                say(&format!(
                    "{} copies share their kept file's creation time and were left alone \
                     (use --tie-policy path-only to remove them)",
                    report.spared.len()
                ));
            }
            say(&report.summary());
            partial |= !report.all_succeeded();
        }
        Action::Quit => {}
    }

    if interactive && !quiet {
        say("Done, press any key to close");
        prompt::wait_for_key()?;
    }

    Ok(ExitCode::Success.or_partial(partial))
}

/// Config file and environment, overridden by command-line flags.
fn effective_config(cli: &Cli) -> Config {
    let mut config = Config::load();
    if let Some(ref path) = cli.output_file {
        config.output_file = path.clone();
    }
    if let Some(policy) = cli.tie_policy {
        config.tie_policy = policy;
    }
    if let Some(interval) = cli.progress_interval {
        config.progress_interval = interval;
    }
    config.follow_symlinks |= cli.follow_symlinks;
    config
}
