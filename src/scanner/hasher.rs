//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! [`Hasher`] computes a BLAKE3 fingerprint over the full content of a file,
//! reading it in fixed-size chunks so memory use does not grow with file
//! size. The file handle lives only for the duration of one call and is
//! dropped even when a read fails partway.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::HashError;

/// A 256-bit BLAKE3 digest.
pub type Hash = [u8; 32];

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming BLAKE3 file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the read buffer size. Zero is bumped to one byte.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Hash the full content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails.
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buffer[..n]);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            }
        }

        log::trace!("Hashed {}", path.display());
        Ok(*hasher.finalize().as_bytes())
    }

    /// Check that a file can be opened for reading without hashing it.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened.
    pub fn check_readable(&self, path: &Path) -> Result<(), HashError> {
        File::open(path)
            .map(drop)
            .map_err(|e| HashError::from_io(path, e))
    }

    /// Hash an in-memory buffer.
    #[must_use]
    pub fn hash_bytes(data: &[u8]) -> Hash {
        *blake3::hash(data).as_bytes()
    }
}

/// Render a hash as 64 lowercase hex characters.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    blake3::Hash::from(*hash).to_hex().to_string()
}
