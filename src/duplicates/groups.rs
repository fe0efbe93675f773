//! Duplicate grouping by size, name and content fingerprint.
//!
//! # Overview
//!
//! All grouping functions preserve discovery order: groups are ordered by
//! the position of their first member, and members keep the order in which
//! the walker produced them. The first member of a [`DuplicateGroup`] is the
//! original.
//!
//! ## Size Grouping
//!
//! Size grouping is the cheap prefilter for content comparison. Files with
//! a size nobody else shares cannot have a content duplicate and are never
//! hashed.
//!
//! # Example
//!
//! ```
//! use dupescan::scanner::FileRecord;
//! use dupescan::duplicates::{group_by_name, NameKey};
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/a/song.mp3"), 3, SystemTime::now()),
//!     FileRecord::new(PathBuf::from("/b/song.mp3"), 3, SystemTime::now()),
//!     FileRecord::new(PathBuf::from("/b/other.mp3"), 3, SystemTime::now()),
//! ];
//!
//! let groups = group_by_name(&files, NameKey::FileName, &[]);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].files.len(), 2);
//! ```

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::{hash_to_hex, FileRecord, Hash};

/// What a group's members have in common.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Same name key (file name or stem), compared byte for byte
    Name(OsString),
    /// Same BLAKE3 content fingerprint
    Content(Hash),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{}", name.to_string_lossy()),
            Self::Content(hash) => write!(f, "{}", hash_to_hex(hash)),
        }
    }
}

/// How the name key of a file is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NameKey {
    /// The full base file name, extension included
    #[default]
    FileName,
    /// The base file name without its extension
    Stem,
}

impl NameKey {
    /// Compute the key for a record.
    #[must_use]
    pub fn key_for(self, file: &FileRecord) -> OsString {
        match self {
            Self::FileName => file.name.clone(),
            Self::Stem => Path::new(&file.name)
                .file_stem()
                .map_or_else(|| file.name.clone(), ToOwned::to_owned),
        }
    }
}

/// Which member of a name group is kept as the original.
///
/// Content groups always keep the first-discovered member since all members
/// have the same size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum KeepPolicy {
    /// First in traversal order
    #[default]
    First,
    /// Largest file; ties keep traversal order
    Largest,
    /// Smallest file; ties keep traversal order
    Smallest,
}

impl KeepPolicy {
    /// Reorder a group so the kept file comes first.
    ///
    /// The sort is stable, so equal sizes keep their discovery order.
    pub fn apply(self, group: &mut DuplicateGroup) {
        match self {
            Self::First => {}
            Self::Largest => group.files.sort_by(|a, b| b.size.cmp(&a.size)),
            Self::Smallest => group.files.sort_by_key(|f| f.size),
        }
    }
}

/// A set of files sharing a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Shared key
    pub key: GroupKey,
    /// Members; the first one is the original
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(key: GroupKey, files: Vec<FileRecord>) -> Self {
        Self { key, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The member suggested to keep.
    #[must_use]
    pub fn original(&self) -> Option<&FileRecord> {
        self.files.first()
    }

    /// Every member except the original.
    #[must_use]
    pub fn duplicates(&self) -> &[FileRecord] {
        self.files.get(1..).unwrap_or(&[])
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes freed by removing every duplicate.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.duplicates().iter().map(|f| f.size).sum()
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from the size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files in size groups of 2+ (hash candidates)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton sizes)
    pub eliminated_unique: usize,
    /// Number of empty files encountered
    pub empty_files: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group items by key, keeping first-appearance order of both groups and members.
fn group_in_order<'a, K, I, F>(files: I, mut key_fn: F) -> Vec<(K, Vec<&'a FileRecord>)>
where
    K: Eq + std::hash::Hash + Clone,
    I: IntoIterator<Item = &'a FileRecord>,
    F: FnMut(&FileRecord) -> Option<K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a FileRecord>)> = Vec::new();

    for file in files {
        let Some(key) = key_fn(file) else {
            continue;
        };
        match index.get(&key) {
            Some(&i) => groups[i].1.push(file),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![file]));
            }
        }
    }

    groups
}

/// Group files by size.
///
/// Returns only sizes shared by 2+ files, along with statistics. No file
/// I/O is performed.
#[must_use]
pub fn group_by_size<'a>(
    files: impl IntoIterator<Item = &'a FileRecord>,
) -> (HashMap<u64, Vec<&'a FileRecord>>, GroupingStats) {
    let mut stats = GroupingStats::default();

    let all_groups = group_in_order(files, |file| {
        stats.total_files += 1;
        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }
        Some(file.size)
    });

    stats.unique_sizes = all_groups.len();

    let mut filtered = HashMap::new();
    for (size, files) in all_groups {
        if files.len() == 1 {
            stats.eliminated_unique += 1;
            log::trace!("Eliminated unique size {}: {}", size, files[0].path.display());
        } else {
            stats.potential_duplicates += files.len();
            log::debug!("Size group {} bytes: {} candidates", size, files.len());
            filtered.insert(size, files);
        }
    }

    (filtered, stats)
}

/// Group files by name key.
///
/// When `extensions` is non-empty only files with one of those extensions
/// (case-insensitive, leading dot optional) take part.
#[must_use]
pub fn group_by_name(
    files: &[FileRecord],
    name_key: NameKey,
    extensions: &[String],
) -> Vec<DuplicateGroup> {
    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect();

    group_in_order(files, |file| {
        if !wanted.is_empty() {
            let ext = file.extension()?;
            if !wanted.contains(&ext) {
                return None;
            }
        }
        Some(name_key.key_for(file))
    })
    .into_iter()
    .filter(|(_, members)| members.len() > 1)
    .map(|(name, members)| {
        DuplicateGroup::new(GroupKey::Name(name), members.into_iter().cloned().collect())
    })
    .collect()
}

/// Group files by content fingerprint.
///
/// Files without a fingerprint are ignored.
#[must_use]
pub fn group_by_fingerprint(files: &[FileRecord]) -> Vec<DuplicateGroup> {
    group_in_order(files, |file| file.fingerprint)
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(hash, members)| {
            DuplicateGroup::new(
                GroupKey::Content(hash),
                members.into_iter().cloned().collect(),
            )
        })
        .collect()
}
