//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Text report with `rm` commands (default)
//! - POSIX shell script for review and execution
//! - JSON for automation and scripting
//!
//! All three render the same [`RemovalPlan`], so a path is never suggested
//! for removal twice.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use dupescan::output;
//! use std::path::Path;
//!
//! let result = DuplicateFinder::with_defaults().scan_path(Path::new(".")).unwrap();
//! print!("{}", output::report(&result));
//! ```

pub mod json;
pub mod plan;
pub mod script;
pub mod text;

// Re-export main types
pub use json::JsonOutput;
pub use plan::{escape_posix, rm_command, Removal, RemovalPlan, Section};
pub use script::ScriptOutput;
pub use text::TextReport;

use crate::duplicates::ScanResult;

/// Render the text report for a scan result.
#[must_use]
pub fn report(result: &ScanResult) -> String {
    TextReport::new(result).render()
}
