//! SHA-256 content hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Fingerprint`] type (a 32-byte SHA-256 digest)
//! and the [`Hasher`] struct that computes it from file content using a
//! fixed-size read buffer, so large files never need to fit in memory.
//!
//! A fingerprint depends only on the bytes: the same content always yields
//! the same fingerprint regardless of file name, location or timestamps.
//!
//! # Example
//!
//! ```
//! use hashdupe::scanner::{hash_bytes, Fingerprint};
//!
//! let fp = hash_bytes(b"");
//! assert_eq!(
//!     fp.to_hex(),
//!     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
//! );
//! assert_eq!(fp, hash_bytes(b""));
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::HashError;

/// Length of a fingerprint in bytes.
pub const FINGERPRINT_LEN: usize = 32;

/// Default read buffer size for streaming hashes (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// SHA-256 digest of a file's content.
///
/// Displayed and serialized as a 64-character lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Wrap raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Lowercase hexadecimal representation (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// First `len` hex characters, for compact log output.
    #[must_use]
    pub fn short_hex(&self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len);
        hex
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

/// Error returned when parsing a fingerprint from a hex string fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFingerprintError {
    /// The string does not have exactly 64 characters.
    #[error("Invalid fingerprint length: expected 64 hex characters, got {0}")]
    InvalidLength(usize),

    /// The string contains a non-hexadecimal character.
    #[error("Invalid hex character in fingerprint: {0:?}")]
    InvalidCharacter(char),
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != FINGERPRINT_LEN * 2 {
            return Err(ParseFingerprintError::InvalidLength(s.len()));
        }

        let mut bytes = [0u8; FINGERPRINT_LEN];
        for (byte, pair) in bytes.iter_mut().zip(s.as_bytes().chunks_exact(2)) {
            *byte = (hex_value(pair[0])? << 4) | hex_value(pair[1])?;
        }
        Ok(Self(bytes))
    }
}

fn hex_value(b: u8) -> Result<u8, ParseFingerprintError> {
    char::from(b)
        .to_digit(16)
        .map(|d| d as u8)
        .ok_or(ParseFingerprintError::InvalidCharacter(char::from(b)))
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Compute the fingerprint of an in-memory byte slice.
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> Fingerprint {
    finish(Sha256::new().chain_update(bytes))
}

fn finish(hasher: Sha256) -> Fingerprint {
    let mut out = [0u8; FINGERPRINT_LEN];
    out.copy_from_slice(&hasher.finalize());
    Fingerprint::from_bytes(out)
}

/// Streaming content hasher.
///
/// Holds only its buffer size, so one instance can be shared by every
/// worker of a walk.
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
    /// Create a hasher with the default 64 KiB buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Use a custom read buffer size (clamped to at least 1 byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Hash everything readable from `reader` until EOF.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error other than [`io::ErrorKind::Interrupted`].
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Fingerprint> {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(finish(hasher))
    }

    /// Hash a file on the local filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when the file cannot be opened or read. An
    /// unreadable file never yields a fingerprint.
    pub fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file).map_err(|e| HashError::from_io(path, e))
    }
}
