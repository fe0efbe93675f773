//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! [`Walker`] traverses a directory tree depth-first, visiting the entries of
//! each directory sorted by file name, so the discovery order is the same on
//! every run over an unchanged tree. That order decides which member of a
//! duplicate group is treated as the original.
//!
//! Only regular files are yielded. Symbolic links are leaves: they are not
//! followed and not recorded unless [`WalkerConfig::follow_symlinks`] is set.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Music"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::{DirEntry, WalkDir};

use super::{FileRecord, ScanError, WalkerConfig};

/// Directory walker for sorted file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Check if a file passes size filters.
    fn passes_size_filter(&self, size: u64) -> bool {
        if self.config.skip_empty && size == 0 {
            return false;
        }
        if let Some(min) = self.config.min_size {
            if size < min {
                return false;
            }
        }
        true
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. A [`ScanError::RootUnreadable`] means nothing below the
    /// root could be listed.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Turn a directory entry into a record, or drop it.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileRecord, ScanError>> {
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }

        // With follow_links enabled walkdir reports the target's type, so a
        // symlink type here means the link is not being followed.
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", path.display());
            return None;
        }

        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", path.display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_walk_error(e))),
        };

        let size = metadata.len();
        if !self.passes_size_filter(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                path.display()
            );
            return None;
        }

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Some(Ok(FileRecord::new(path.to_path_buf(), size, modified)))
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            let ancestor = ancestor.to_path_buf();
            log::warn!(
                "Symlink loop at {} (points to {})",
                path.display(),
                ancestor.display()
            );
            return ScanError::SymlinkLoop { path, ancestor };
        }

        let depth = error.depth();
        let source = match error.into_io_error() {
            Some(io) => io,
            None => std::io::Error::other("directory walk failed"),
        };

        if depth == 0 {
            log::error!("Cannot read {}: {}", path.display(), source);
            return ScanError::RootUnreadable { path, source };
        }

        match source.kind() {
            std::io::ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            std::io::ErrorKind::NotFound => {
                log::debug!("File not found (may have been deleted): {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), source);
                ScanError::Io { path, source }
            }
        }
    }
}
