//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based prefiltering
//! - Name and content grouping
//! - Scan orchestration

pub mod finder;
pub mod groups;

pub use finder::{
    scan, DuplicateFinder, FinderConfig, FinderError, ScanMode, ScanResult, ScanSummary,
};
pub use groups::{
    group_by_fingerprint, group_by_name, group_by_size, DuplicateGroup, GroupKey, GroupingStats,
    KeepPolicy, NameKey,
};
