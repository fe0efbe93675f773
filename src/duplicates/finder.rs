//! Scan orchestration.
//!
//! [`DuplicateFinder`] runs the pipeline:
//! 1. **Walk** - collect every regular file under the root, in sorted order
//! 2. **Size** - find sizes shared by 2+ files (content candidates)
//! 3. **Hash** - fingerprint candidates; open-check everything else
//! 4. **Group** - build name groups and content groups from the survivors
//!
//! A file that cannot be read in step 3 is dropped from every group, logged,
//! and listed in [`ScanResult::skipped`]. Only an unreadable root aborts.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use super::groups::{
    group_by_fingerprint, group_by_name, group_by_size, DuplicateGroup, KeepPolicy, NameKey,
};
use crate::config::{ConfigError, ScanRoot};
use crate::scanner::{FileRecord, Hasher, ScanError, Walker, WalkerConfig};

/// Which groupings a scan produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScanMode {
    /// Name groups and content groups
    #[default]
    Both,
    /// Name groups only (no file content is read beyond an open check)
    Name,
    /// Content groups only
    Content,
}

impl ScanMode {
    /// Whether name groups are built.
    #[must_use]
    pub fn by_name(self) -> bool {
        matches!(self, Self::Both | Self::Name)
    }

    /// Whether content groups are built.
    #[must_use]
    pub fn by_content(self) -> bool {
        matches!(self, Self::Both | Self::Content)
    }
}

/// Configuration for the duplicate finder.
#[derive(Debug, Clone, Default)]
pub struct FinderConfig {
    /// Directory walking options
    pub walker_config: WalkerConfig,
    /// Which groupings to build
    pub mode: ScanMode,
    /// How name keys are derived
    pub name_key: NameKey,
    /// Extensions that take part in name grouping (empty = all)
    pub name_extensions: Vec<String>,
    /// Which member of a name group is the original
    pub keep: KeepPolicy,
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the scan mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the name key.
    #[must_use]
    pub fn with_name_key(mut self, name_key: NameKey) -> Self {
        self.name_key = name_key;
        self
    }

    /// Restrict name grouping to these extensions.
    #[must_use]
    pub fn with_name_extensions(mut self, extensions: Vec<String>) -> Self {
        self.name_extensions = extensions;
        self
    }

    /// Set the keep policy for name groups.
    #[must_use]
    pub fn with_keep(mut self, keep: KeepPolicy) -> Self {
        self.keep = keep;
        self
    }
}

/// Summary statistics from a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Regular files found by the walk
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Files whose content was hashed
    pub hashed_files: usize,
    /// Files and entries skipped because of an access error
    pub skipped_files: usize,
    /// Number of name groups
    pub name_groups: usize,
    /// Duplicates (non-originals) across name groups
    pub name_duplicates: usize,
    /// Number of content groups
    pub content_groups: usize,
    /// Duplicates (non-originals) across content groups
    pub content_duplicates: usize,
    /// Bytes held by content duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize::b(self.total_size).to_string()
    }
}

/// Everything a scan produced.
#[derive(Debug)]
pub struct ScanResult {
    /// The scanned directory
    pub root: PathBuf,
    /// Groups of files sharing a name key, in discovery order
    pub name_groups: Vec<DuplicateGroup>,
    /// Groups of files sharing content, in discovery order
    pub content_groups: Vec<DuplicateGroup>,
    /// Scan statistics
    pub summary: ScanSummary,
    /// Entries that were skipped, with the reason
    pub skipped: Vec<ScanError>,
}

impl ScanResult {
    /// Whether any group was found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.name_groups.is_empty() || !self.content_groups.is_empty()
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan root failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The scan root could not be listed.
    #[error(transparent)]
    ScanError(#[from] ScanError),
}

/// Duplicate finder that runs the scan pipeline.
///
/// # Example
///
/// ```no_run
/// use dupescan::config::ScanRoot;
/// use dupescan::duplicates::{DuplicateFinder, FinderConfig};
///
/// let root = ScanRoot::new("/home/user/Music").unwrap();
/// let result = DuplicateFinder::new(FinderConfig::default()).scan(&root).unwrap();
///
/// println!("{} name groups", result.name_groups.len());
/// println!("{} content groups", result.content_groups.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Validate `path` and scan it.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] if the path is missing or not a
    /// directory, or [`FinderError::ScanError`] if it cannot be listed.
    pub fn scan_path(&self, path: &Path) -> Result<ScanResult, FinderError> {
        let root = ScanRoot::new(path)?;
        self.scan(&root)
    }

    /// Scan a validated root for duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::ScanError`] if the root directory itself
    /// cannot be read. Per-file failures are recovered and reported in
    /// [`ScanResult::skipped`].
    pub fn scan(&self, root: &ScanRoot) -> Result<ScanResult, FinderError> {
        let start_time = Instant::now();
        let mut skipped = Vec::new();

        log::info!("Starting duplicate scan of {}", root.path().display());

        // Walk
        let walker = Walker::new(root.path(), self.config.walker_config.clone());
        let mut records = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(record) => records.push(record),
                Err(e) if e.is_fatal() => return Err(FinderError::ScanError(e)),
                Err(e) => skipped.push(e),
            }
        }

        Ok(self.scan_records(root.path().to_path_buf(), records, skipped, start_time))
    }

    /// Size, hash and group walked records.
    ///
    /// A record whose file can no longer be read is moved to `skipped`.
    pub(crate) fn scan_records(
        &self,
        root: PathBuf,
        records: Vec<FileRecord>,
        mut skipped: Vec<ScanError>,
        start_time: Instant,
    ) -> ScanResult {
        let mut summary = ScanSummary {
            total_files: records.len(),
            total_size: records.iter().map(|r| r.size).sum(),
            ..ScanSummary::default()
        };
        log::info!(
            "Found {} files ({})",
            summary.total_files,
            summary.total_size_display()
        );

        // Size prefilter
        let candidate_sizes: HashSet<u64> = if self.config.mode.by_content() {
            let (size_groups, size_stats) = group_by_size(&records);
            log::info!(
                "Size grouping: {} files, {} hash candidates ({:.1}% eliminated)",
                size_stats.total_files,
                size_stats.potential_duplicates,
                size_stats.elimination_rate()
            );
            size_groups.into_keys().collect()
        } else {
            HashSet::new()
        };

        // Hash candidates, open-check the rest
        let mut readable = Vec::with_capacity(records.len());
        for record in records {
            if candidate_sizes.contains(&record.size) {
                match self.hasher.full_hash(&record.path) {
                    Ok(hash) => {
                        summary.hashed_files += 1;
                        readable.push(record.with_fingerprint(hash));
                    }
                    Err(e) => {
                        log::warn!("Skipping unreadable file: {}", e);
                        skipped.push(ScanError::from(e));
                    }
                }
            } else {
                match self.hasher.check_readable(&record.path) {
                    Ok(()) => readable.push(record),
                    Err(e) => {
                        log::warn!("Skipping unreadable file: {}", e);
                        skipped.push(ScanError::from(e));
                    }
                }
            }
        }

        // Group
        let mut name_groups = if self.config.mode.by_name() {
            group_by_name(
                &readable,
                self.config.name_key,
                &self.config.name_extensions,
            )
        } else {
            Vec::new()
        };
        for group in &mut name_groups {
            self.config.keep.apply(group);
        }

        let content_groups = if self.config.mode.by_content() {
            group_by_fingerprint(&readable)
        } else {
            Vec::new()
        };

        summary.skipped_files = skipped.len();
        summary.name_groups = name_groups.len();
        summary.name_duplicates = name_groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.content_groups = content_groups.len();
        summary.content_duplicates = content_groups
            .iter()
            .map(DuplicateGroup::duplicate_count)
            .sum();
        summary.reclaimable_space = content_groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} name groups, {} content groups, {} reclaimable, {} skipped",
            summary.name_groups,
            summary.content_groups,
            summary.reclaimable_display(),
            summary.skipped_files
        );

        ScanResult {
            root,
            name_groups,
            content_groups,
            summary,
            skipped,
        }
    }
}

/// Scan `root` with default options.
///
/// Returns the name groups and the content groups.
///
/// # Errors
///
/// See [`DuplicateFinder::scan_path`].
pub fn scan(root: &Path) -> Result<(Vec<DuplicateGroup>, Vec<DuplicateGroup>), FinderError> {
    let result = DuplicateFinder::with_defaults().scan_path(root)?;
    Ok((result.name_groups, result.content_groups))
}
