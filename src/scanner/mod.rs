//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sorted, single-threaded directory walking using walkdir
//! - Content fingerprinting with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// Re-export main types
pub use hasher::{hash_to_hex, Hash, Hasher};
pub use walker::Walker;

/// One discovered file.
///
/// The fingerprint is filled in by the finder only for files whose size is
/// shared with another file; every other field is set during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Base filename (last path component), byte-exact
    pub name: OsString,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// BLAKE3 hash of the full content, if computed
    pub fingerprint: Option<Hash>,
}

impl FileRecord {
    /// Create a new record. The base name is taken from the last path component.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        let name = base_name(&path);
        Self {
            path,
            name,
            size,
            modified,
            fingerprint: None,
        }
    }

    /// Attach a content fingerprint.
    #[must_use]
    pub fn with_fingerprint(mut self, hash: Hash) -> Self {
        self.fingerprint = Some(hash);
        self
    }

    /// Fingerprint as hexadecimal string, if computed.
    #[must_use]
    pub fn fingerprint_hex(&self) -> Option<String> {
        self.fingerprint.as_ref().map(hash_to_hex)
    }

    /// Base filename for display; invalid UTF-8 is replaced.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }

    /// Lowercased extension without the leading dot.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

fn base_name(path: &Path) -> OsString {
    path.file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| path.as_os_str().to_owned())
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Cycles are detected and reported as skipped entries.
    pub follow_symlinks: bool,

    /// Skip zero-length files.
    pub skip_empty: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: Option<u64>,
}

impl WalkerConfig {
    /// Create a new configuration from CLI arguments.
    #[must_use]
    pub fn new(follow_symlinks: bool, skip_empty: bool, min_size: Option<u64>) -> Self {
        Self {
            follow_symlinks,
            skip_empty,
            min_size,
        }
    }
}

/// Errors that can occur during directory scanning.
///
/// Every variant except [`ScanError::RootUnreadable`] is recoverable: the
/// entry is skipped and the scan continues.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The scan root itself could not be read.
    #[error("Cannot read scan root {path}: {source}")]
    RootUnreadable {
        /// Root path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry disappeared between listing and access.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A followed symlink points back at one of its ancestors.
    #[error("Symlink loop: {path} points to ancestor {ancestor}")]
    SymlinkLoop {
        /// The looping entry
        path: PathBuf,
        /// The ancestor directory it resolves to
        ancestor: PathBuf,
    },

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading a file's content failed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Whether this error must abort the scan.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RootUnreadable { .. })
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::RootUnreadable { path, .. }
            | Self::SymlinkLoop { path, .. }
            | Self::Io { path, .. } => path.as_path(),
            Self::PermissionDenied(path) | Self::NotFound(path) => path.as_path(),
            Self::Hash(err) => err.path(),
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path) | Self::PermissionDenied(path) => path.as_path(),
            Self::Io { path, .. } => path.as_path(),
        }
    }
}
