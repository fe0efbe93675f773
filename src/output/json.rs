//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "root": "/home/user/Music",
//!   "summary": {
//!     "total_files": 100,
//!     "total_size": 1048576,
//!     "hashed_files": 12,
//!     "skipped_files": 0,
//!     "name_groups": 1,
//!     "name_duplicates": 1,
//!     "content_groups": 1,
//!     "content_duplicates": 1,
//!     "reclaimable_space": 4096,
//!     "scan_duration_ms": 12
//!   },
//!   "name_groups": [
//!     { "key": "song.mp3", "files": [{ "path": "...", "size": 4096 }] }
//!   ],
//!   "content_groups": [
//!     { "key": "af1349b9...", "files": [{ "path": "...", "size": 4096 }] }
//!   ],
//!   "removals": [
//!     { "path": "...", "size": 4096, "kept": "...", "section": "name", "command": "rm '...'" }
//!   ],
//!   "skipped": [
//!     { "path": "...", "error": "Permission denied: ..." }
//!   ]
//! }
//! ```

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::plan::{RemovalPlan, Section};
use crate::duplicates::{DuplicateGroup, ScanResult, ScanSummary};

/// One file in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Absolute path
    pub path: String,
    /// Size in bytes
    pub size: u64,
}

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// Shared name key, or BLAKE3 hash as hexadecimal string
    pub key: String,
    /// Members; the first is the original
    pub files: Vec<JsonFile>,
}

impl JsonGroup {
    /// Create a JSON group from a [`DuplicateGroup`].
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            key: group.key.to_string(),
            files: group
                .files
                .iter()
                .map(|f| JsonFile {
                    path: path_string(&f.path),
                    size: f.size,
                })
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Files whose content was hashed
    pub hashed_files: usize,
    /// Entries skipped because of an access error
    pub skipped_files: usize,
    /// Number of name groups
    pub name_groups: usize,
    /// Duplicates across name groups
    pub name_duplicates: usize,
    /// Number of content groups
    pub content_groups: usize,
    /// Duplicates across content groups
    pub content_duplicates: usize,
    /// Bytes held by content duplicates
    pub reclaimable_space: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
}

impl From<&ScanSummary> for JsonSummary {
    fn from(summary: &ScanSummary) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            hashed_files: summary.hashed_files,
            skipped_files: summary.skipped_files,
            name_groups: summary.name_groups,
            name_duplicates: summary.name_duplicates,
            content_groups: summary.content_groups,
            content_duplicates: summary.content_duplicates,
            reclaimable_space: summary.reclaimable_space,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
        }
    }
}

/// A planned removal in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRemoval {
    /// File suggested for removal
    pub path: String,
    /// Its size in bytes
    pub size: u64,
    /// File kept in its place
    pub kept: String,
    /// Section that suggested it
    pub section: Section,
    /// Ready-to-run `rm` command
    pub command: String,
}

/// A skipped entry in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSkipped {
    /// Path that could not be read
    pub path: String,
    /// Why it was skipped
    pub error: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Scanned directory
    pub root: String,
    /// Scan summary statistics
    pub summary: JsonSummary,
    /// Groups sharing a name key
    pub name_groups: Vec<JsonGroup>,
    /// Groups sharing content
    pub content_groups: Vec<JsonGroup>,
    /// De-duplicated removal plan
    pub removals: Vec<JsonRemoval>,
    /// Entries skipped during the scan
    pub skipped: Vec<JsonSkipped>,
}

impl JsonOutput {
    /// Create a new JSON output from a scan result.
    #[must_use]
    pub fn new(result: &ScanResult) -> Self {
        let plan = RemovalPlan::from_result(result);
        Self {
            root: path_string(&result.root),
            summary: JsonSummary::from(&result.summary),
            name_groups: result
                .name_groups
                .iter()
                .map(JsonGroup::from_duplicate_group)
                .collect(),
            content_groups: result
                .content_groups
                .iter()
                .map(JsonGroup::from_duplicate_group)
                .collect(),
            removals: plan
                .removals()
                .iter()
                .map(|r| JsonRemoval {
                    path: path_string(&r.path),
                    size: r.size,
                    kept: path_string(&r.kept),
                    section: r.section,
                    command: r.command(),
                })
                .collect(),
            skipped: result
                .skipped
                .iter()
                .map(|e| JsonSkipped {
                    path: path_string(e.path()),
                    error: e.to_string(),
                })
                .collect(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
