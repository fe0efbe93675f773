//! Removal plan shared by every output format.
//!
//! The plan walks the name section first, then the content section, and
//! suggests each duplicate path at most once. In the content section the
//! kept file is the first member that is not already planned for removal, so
//! at least one copy of every content group survives the name pass. A file
//! kept as a name original is never removed by the content pass.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanResult};

/// Report section a removal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Same name key
    Name,
    /// Same content fingerprint
    Content,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "Name"),
            Self::Content => write!(f, "Content"),
        }
    }
}

/// One planned removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// File suggested for removal
    pub path: PathBuf,
    /// Its size in bytes
    pub size: u64,
    /// The file kept in its place
    pub kept: PathBuf,
    /// Section that suggested it
    pub section: Section,
}

impl Removal {
    /// The `rm` command for this removal.
    #[must_use]
    pub fn command(&self) -> String {
        rm_command(&self.path)
    }
}

/// Ordered, de-duplicated list of suggested removals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalPlan {
    removals: Vec<Removal>,
}

impl RemovalPlan {
    /// Build the plan for a scan result.
    #[must_use]
    pub fn from_result(result: &ScanResult) -> Self {
        Self::new(&result.name_groups, &result.content_groups)
    }

    /// Build the plan from name groups and content groups.
    #[must_use]
    pub fn new(name_groups: &[DuplicateGroup], content_groups: &[DuplicateGroup]) -> Self {
        let mut planned: HashSet<PathBuf> = HashSet::new();
        let mut kept: HashSet<&Path> = HashSet::new();
        let mut removals = Vec::new();

        for group in name_groups {
            let Some(original) = group.original() else {
                continue;
            };
            kept.insert(original.path.as_path());
            for dup in group.duplicates() {
                if planned.insert(dup.path.clone()) {
                    removals.push(Removal {
                        path: dup.path.clone(),
                        size: dup.size,
                        kept: original.path.clone(),
                        section: Section::Name,
                    });
                }
            }
        }

        for group in content_groups {
            let Some(keeper) = group.files.iter().find(|f| !planned.contains(&f.path)) else {
                log::debug!("Content group {} already fully planned", group.key);
                continue;
            };
            let keeper = keeper.path.clone();
            for file in &group.files {
                if file.path == keeper || kept.contains(file.path.as_path()) {
                    continue;
                }
                if planned.insert(file.path.clone()) {
                    removals.push(Removal {
                        path: file.path.clone(),
                        size: file.size,
                        kept: keeper.clone(),
                        section: Section::Content,
                    });
                }
            }
        }

        Self { removals }
    }

    /// All removals in report order.
    #[must_use]
    pub fn removals(&self) -> &[Removal] {
        &self.removals
    }

    /// Removals suggested by one section.
    pub fn section(&self, section: Section) -> impl Iterator<Item = &Removal> + '_ {
        self.removals.iter().filter(move |r| r.section == section)
    }

    /// Whether `path` is planned for removal.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.removals.iter().any(|r| r.path == path)
    }

    /// Number of planned removals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.removals.len()
    }

    /// Check if nothing is planned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }

    /// Bytes freed by every planned removal.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.removals.iter().map(|r| r.size).sum()
    }
}

/// Quote a path for a POSIX shell.
///
/// Wraps the path in single quotes; an embedded `'` becomes `'\''`. On unix
/// a name that is not valid UTF-8 keeps its exact bytes: each run of
/// non-ASCII bytes is produced by a `printf` octal escape.
#[must_use]
pub fn escape_posix(path: &Path) -> String {
    match path.to_str() {
        Some(text) => quote_text(text),
        None => quote_raw(path),
    }
}

fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

#[cfg(unix)]
fn quote_raw(path: &Path) -> String {
    use std::fmt::Write as _;
    use std::os::unix::ffi::OsStrExt;

    let mut quoted = String::new();
    for run in path.as_os_str().as_bytes().chunk_by(|a, b| a.is_ascii() == b.is_ascii()) {
        if run[0].is_ascii() {
            let text: String = run.iter().copied().map(char::from).collect();
            quoted.push_str(&quote_text(&text));
        } else {
            quoted.push_str("\"$(printf '");
            for byte in run {
                let _ = write!(quoted, "\\{byte:03o}");
            }
            quoted.push_str("')\"");
        }
    }
    quoted
}

#[cfg(not(unix))]
fn quote_raw(path: &Path) -> String {
    quote_text(&path.to_string_lossy())
}

/// `rm` command for one path.
#[must_use]
pub fn rm_command(path: &Path) -> String {
    format!("rm {}", escape_posix(path))
}
