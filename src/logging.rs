//! Diagnostic logging on stderr.
//!
//! stdout carries the report and nothing else. Progress, skipped files and
//! debug detail go through the `log` macros to an `env_logger` writer on
//! stderr. A non-empty `RUST_LOG` replaces the `--verbose`/`--quiet` flags.
//!
//! ```rust,no_run
//! use dupescan::logging::init_logging;
//!
//! // -vv
//! init_logging(2, false);
//! log::trace!("Hashed /music/a/song.mp3");
//! ```

use std::env;
use std::io::Write;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Filter applied to the logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFilter {
    /// Directives taken from `RUST_LOG`
    Directives(String),
    /// Level picked from the command-line flags
    Level(LevelFilter),
}

impl LogFilter {
    /// Choose between `RUST_LOG` and the flags.
    #[must_use]
    pub fn select(verbose: u8, quiet: bool, rust_log: Option<String>) -> Self {
        match rust_log {
            Some(directives) if !directives.trim().is_empty() => Self::Directives(directives),
            _ => Self::Level(level_from_flags(verbose, quiet)),
        }
    }

    fn apply(&self, builder: &mut Builder) {
        match self {
            Self::Directives(directives) => builder.parse_filters(directives),
            Self::Level(level) => builder.filter_level(*level),
        };
    }
}

/// `--quiet` beats `--verbose`; each `-v` goes one level deeper.
fn level_from_flags(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Install the stderr logger.
///
/// At `-vv` or under `RUST_LOG` each line also carries a timestamp and the
/// log target. Only the first call in a process takes effect.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = LogFilter::select(verbose, quiet, env::var("RUST_LOG").ok());
    let detailed = verbose >= 2 || matches!(filter, LogFilter::Directives(_));

    let mut builder = Builder::new();
    builder.target(Target::Stderr);
    filter.apply(&mut builder);
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        if detailed {
            write!(buf, "{} ", buf.timestamp_seconds())?;
        }
        write!(buf, "{style}{:<5}{style:#} ", record.level())?;
        if detailed {
            write!(buf, "[{}] ", record.target())?;
        }
        writeln!(buf, "{}", record.args())
    });

    if builder.try_init().is_ok() {
        log::debug!("Logging initialized with {filter:?}");
    }
}
