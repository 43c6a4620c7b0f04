//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing SHA-256
//! fingerprints of file contents. Files are read through a fixed-size
//! buffer, so memory use is constant regardless of file size.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let hash = hasher.full_hash(Path::new("Cargo.toml")).unwrap();
//! println!("{}", hash_to_hex(&hash));
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::digest::Output;
use sha2::{Digest, Sha256};

use super::HashError;

/// A 256-bit content digest.
pub type Hash = [u8; 32];

/// Default read buffer size (64 KiB).
const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming SHA-256 hasher for file content.
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

    /// Hash the full contents of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails.
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        self.digest_file(path).map(Into::into)
    }

    /// Hash a file and return the digest as lowercase hex.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::full_hash`].
    pub fn checksum(&self, path: &Path) -> Result<String, HashError> {
        self.digest_file(path).map(|digest| format!("{digest:x}"))
    }

    /// Stream a file through SHA-256.
    ///
    /// The file handle lives only for the duration of this call.
    fn digest_file(&self, path: &Path) -> Result<Output<Sha256>, HashError> {
        let mut file =
            File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let n = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path.to_path_buf(), e)),
            };
            hasher.update(&buffer[..n]);
        }

        log::trace!("Hashed {}", path.display());
        Ok(hasher.finalize())
    }

    /// Hash an in-memory byte slice.
    #[must_use]
    pub fn hash_bytes(data: &[u8]) -> Hash {
        Sha256::digest(data).into()
    }
}

/// Encode a hash as 64 lowercase hex characters.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    format!("{:x}", Output::<Sha256>::clone_from_slice(hash))
}

/// Decode a 64-character hex string into a hash.
///
/// Returns `None` if the string has the wrong length or contains
/// non-hex characters. Both upper and lower case are accepted.
#[must_use]
pub fn hex_to_hash(hex: &str) -> Option<Hash> {
    if hex.len() != 64 || !hex.is_ascii() {
        return None;
    }
    let mut hash = [0u8; 32];
    for (i, byte) in hash.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(hash)
}
