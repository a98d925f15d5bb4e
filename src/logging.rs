//! Logging setup: `log` facade, `env_logger` backend.
//!
//! Level selection, highest priority first:
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. `--quiet`: errors only
//! 3. `-v` debug, `-vv` trace
//! 4. Default: warn
//!
//! Info records stay hidden by default; the console reporter prints the
//! user-facing lines.
//!
//! ```rust,no_run
//! use dupedetect::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible with -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize logging from the CLI verbosity flags.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        if verbose >= 1 {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                buf.timestamp_millis(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
        }
    });

    if builder.try_init().is_ok() {
        log::debug!("Logging initialized at level: {}", log::max_level());
    }
}

/// Map CLI flags to a level filter.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
