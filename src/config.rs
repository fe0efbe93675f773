//! Configuration of the scan root.
//!
//! The only configurable value is the directory to scan. It is resolved once
//! at startup from these sources, lowest to highest precedence:
//!
//! 1. built-in default (unset)
//! 2. a TOML file with a `lookup_folder` key: the file given with
//!    `--config`, or `config.toml` in the platform config directory
//! 3. the `LOOKUP_FOLDER` environment variable
//! 4. the `PATH` command-line argument
//!
//! The resolved value is validated into a [`ScanRoot`], which is what the
//! scanner takes. Nothing below this module reads the environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Environment variable holding the scan root.
pub const LOOKUP_FOLDER_ENV: &str = "LOOKUP_FOLDER";

/// Errors raised while resolving the scan root.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// No source provided a scan root.
    #[error(
        "LOOKUP_FOLDER is not set. Pass a PATH argument, export LOOKUP_FOLDER=/path/to/folder, \
         or put lookup_folder = \"/path/to/folder\" in the config file"
    )]
    Missing,

    /// The scan root does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The scan root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The scan root exists but its metadata cannot be read.
    #[error("Cannot access {path}: {source}")]
    Inaccessible {
        /// The configured path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    /// A config source could not be parsed.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

/// Raw configuration as read from file and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory to scan for duplicates.
    #[serde(default)]
    pub lookup_folder: Option<PathBuf>,
}

impl Config {
    /// Build the layered figment without the command-line layer.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = config_file
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path)
        {
            log::debug!("Reading config file {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // Taken verbatim: a folder named `2024` or `[music]` is still a path
        match env::var_os(LOOKUP_FOLDER_ENV) {
            Some(folder) => {
                figment.merge(Serialized::default("lookup_folder", PathBuf::from(folder)))
            }
            None => figment,
        }
    }

    /// Load configuration from the config file and environment.
    ///
    /// A missing default config file is not an error; a missing file passed
    /// explicitly is.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit file is missing or a source
    /// cannot be parsed.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
        }
        Ok(Self::figment(config_file).extract()?)
    }

    /// Apply the command-line path, which wins over every other source.
    #[must_use]
    pub fn with_cli_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.lookup_folder = path;
        }
        self
    }

    /// Validate the configured folder.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when no folder is configured, or the
    /// error from [`ScanRoot::new`].
    pub fn scan_root(&self) -> Result<ScanRoot, ConfigError> {
        match &self.lookup_folder {
            Some(path) => ScanRoot::new(path),
            None => Err(ConfigError::Missing),
        }
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupescan").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// A validated, absolute directory to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRoot(PathBuf);

impl ScanRoot {
    /// Validate `path` and canonicalize it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the path is empty, missing, inaccessible,
    /// or not a directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Missing);
        }

        let metadata = fs::metadata(path).map_err(|e| inaccessible(path, e))?;
        if !metadata.is_dir() {
            return Err(ConfigError::NotADirectory(path.to_path_buf()));
        }

        let canonical = path.canonicalize().map_err(|e| inaccessible(path, e))?;
        Ok(Self(canonical))
    }

    /// The absolute root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for ScanRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

fn inaccessible(path: &Path, error: std::io::Error) -> ConfigError {
    if error.kind() == std::io::ErrorKind::NotFound {
        ConfigError::NotFound(path.to_path_buf())
    } else {
        ConfigError::Inaccessible {
            path: path.to_path_buf(),
            source: error,
        }
    }
}
