//! dupescan - duplicate file finder
//!
//! Groups the files under a directory by name and by BLAKE3 content hash,
//! and prints `rm` commands for every copy except the original. Nothing is
//! ever deleted by dupescan itself.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;

use std::io::Write;

use anyhow::Context;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{JsonOutput, ScriptOutput, TextReport};
use crate::scanner::WalkerConfig;

/// Run dupescan, writing the report to stdout.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the root cannot be read,
/// or writing the report fails.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    run_with_writer(cli, &mut handle)
}

/// Run dupescan, writing the report to `writer`.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_with_writer<W: Write>(cli: Cli, writer: &mut W) -> anyhow::Result<ExitCode> {
    let root = Config::load(cli.config.as_deref())?
        .with_cli_path(cli.path)
        .scan_root()?;
    log::debug!("Resolved scan root: {}", root.path().display());

    let walker_config = WalkerConfig::new(cli.follow_symlinks, cli.skip_empty, cli.min_size);
    let finder_config = FinderConfig::default()
        .with_walker_config(walker_config)
        .with_mode(cli.mode)
        .with_name_key(cli.name_key)
        .with_name_extensions(cli.extensions)
        .with_keep(cli.keep);

    let result = DuplicateFinder::new(finder_config)
        .scan(&root)
        .with_context(|| format!("Failed to scan {}", root.path().display()))?;

    match cli.output {
        OutputFormat::Text => TextReport::new(&result)
            .with_mode(cli.mode)
            .write_to(writer)
            .context("Failed to write report")?,
        OutputFormat::Script => ScriptOutput::new(&result)
            .write_to(writer)
            .context("Failed to write script")?,
        OutputFormat::Json => JsonOutput::new(&result)
            .write_to(writer, true)
            .context("Failed to write JSON output")?,
    }
    writer.flush().context("Failed to flush output")?;

    Ok(ExitCode::Success)
}
