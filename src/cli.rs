//! Command-line interface definitions for dupescan.
//!
//! # Example
//!
//! ```bash
//! # Scan the folder named by LOOKUP_FOLDER (env or config file)
//! dupescan
//!
//! # Scan a directory, report name and content duplicates
//! dupescan ~/Music
//!
//! # Group audio files by stem, keep the largest copy
//! dupescan ~/Music --mode name --name-key stem --ext mp3 --ext m4a --keep largest
//!
//! # Emit a reviewable deletion script
//! dupescan ~/Music -o script > cleanup.sh
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::{KeepPolicy, NameKey, ScanMode};

/// Find duplicate files by name and by content.
///
/// dupescan lists duplicate groups and prints `rm` commands for everything
/// except the original in each group. It never deletes anything itself.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (overrides LOOKUP_FOLDER and the config file)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Config file with a `lookup_folder` key
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Which duplicate groupings to report
    #[arg(long, value_enum, default_value = "both")]
    pub mode: ScanMode,

    /// How files are matched by name
    #[arg(long, value_enum, default_value = "file-name")]
    pub name_key: NameKey,

    /// Only group files with this extension by name (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Which file of a name group to keep
    #[arg(long, value_enum, default_value = "first")]
    pub keep: KeepPolicy,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Ignore zero-length files
    #[arg(long)]
    pub skip_empty: bool,

    /// Follow symbolic links during scan
    ///
    /// Cycles are detected and skipped.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print errors to stderr as JSON
    #[arg(long)]
    pub json_errors: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report with rm commands
    #[default]
    Text,
    /// POSIX shell script, dry-run unless run with --confirm
    Script,
    /// JSON output for scripting
    Json,
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupescan::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
