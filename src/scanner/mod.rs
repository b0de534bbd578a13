//! Scanner module for directory traversal and content fingerprinting.
//!
//! This module provides functionality for:
//! - Parallel directory walking over a [`TreeSource`]
//! - Content hashing with SHA-256
//! - Regex-based exclusion filtering
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`source`]: the filesystem abstraction and its local implementation
//! - [`filter`]: exclusion patterns
//! - [`hasher`]: SHA-256 fingerprints (streaming)
//! - [`walker`]: concurrent traversal producing a [`ScanResult`]
//!
//! # Example
//!
//! ```no_run
//! use hashdupe::scanner;
//! use std::path::Path;
//!
//! let result = scanner::walk(Path::new("."), &["target".to_string()]).unwrap();
//! println!(
//!     "{} files, {} directories, {} errors",
//!     result.file_count(),
//!     result.directory_count(),
//!     result.errors.len()
//! );
//! ```

pub mod filter;
pub mod hasher;
pub mod source;
pub mod walker;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// Re-export main types
pub use filter::{ExclusionFilter, FilterError};
pub use hasher::{hash_bytes, Fingerprint, Hasher, ParseFingerprintError};
pub use source::{LocalTree, Node, NodeKind, TreeSource};
pub use walker::{walk, ScanAccumulator, WalkOptions, Walker};

/// What an [`Entry`] is. Files carry their fingerprint, directories none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file with its content fingerprint.
    File(Fingerprint),
    /// A directory.
    Directory,
}

impl EntryKind {
    /// Display label used in tabular output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::File(_) => "File",
            Self::Directory => "Directory",
        }
    }
}

/// Which side of a comparison a fingerprint was found on exclusively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvenanceTag {
    /// Not tagged (present on both sides, or never compared).
    #[default]
    None,
    /// Present only in the reference snapshot.
    ReferenceOnly,
    /// Present only in the comparison snapshot.
    ComparisonOnly,
}

impl ProvenanceTag {
    /// Short marker: `=>` for reference-only, `<=` for comparison-only,
    /// empty when untagged.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::ReferenceOnly => "=>",
            Self::ComparisonOnly => "<=",
        }
    }

    /// Whether this is an actual tag.
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for ProvenanceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One filesystem node observed during a walk.
///
/// Entries are created once by the walker. The fingerprint of a file entry
/// cannot change afterwards; only the provenance tag is writable, and only
/// from within the crate's comparison pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Base name
    pub name: String,
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    /// Size in bytes (0 for directories)
    pub size: u64,
    kind: EntryKind,
    provenance: ProvenanceTag,
}

impl Entry {
    /// Create a file entry.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        relative_path: impl Into<PathBuf>,
        size: u64,
        fingerprint: Fingerprint,
    ) -> Self {
        Self {
            name: name.into(),
            relative_path: relative_path.into(),
            size,
            kind: EntryKind::File(fingerprint),
            provenance: ProvenanceTag::None,
        }
    }

    /// Create a directory entry (size is always 0).
    #[must_use]
    pub fn directory(name: impl Into<String>, relative_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            relative_path: relative_path.into(),
            size: 0,
            kind: EntryKind::Directory,
            provenance: ProvenanceTag::None,
        }
    }

    /// File or directory.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Whether this entry is a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// Content fingerprint; `None` for directories.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        match &self.kind {
            EntryKind::File(fp) => Some(fp),
            EntryKind::Directory => None,
        }
    }

    /// `"File"` or `"Directory"`.
    #[must_use]
    pub fn type_label(&self) -> &'static str {
        self.kind.label()
    }

    /// Provenance tag set by the last comparison pass.
    #[must_use]
    pub fn provenance(&self) -> ProvenanceTag {
        self.provenance
    }

    pub(crate) fn set_provenance(&mut self, tag: ProvenanceTag) {
        self.provenance = tag;
    }
}

/// Output of one tree walk.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Files keyed by fingerprint; each list is in discovery order
    pub files: HashMap<Fingerprint, Vec<Entry>>,
    /// Directories in discovery order
    pub directories: Vec<Entry>,
    /// Non-fatal errors encountered during the walk
    pub errors: Vec<WalkError>,
    /// Whether the walk stopped early on a shutdown request
    pub interrupted: bool,
}

impl ScanResult {
    /// Number of file entries across all fingerprints.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Number of directory entries.
    #[must_use]
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Total size of all file entries in bytes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.entries().map(|e| e.size).sum()
    }

    /// Whether any non-fatal error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The set of distinct fingerprints seen.
    #[must_use]
    pub fn fingerprints(&self) -> HashSet<Fingerprint> {
        self.files.keys().copied().collect()
    }

    /// All file entries (order across fingerprints is unspecified).
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.files.values().flatten()
    }

    /// Mutable access to all file entries, in place.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.files.values_mut().flatten()
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error raised while listing or stat'ing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
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
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::NotADirectory(p) => p,
            Self::Io { path, .. } => path,
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
        source: io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while opening or reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
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
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}

/// A non-fatal problem recorded in [`ScanResult::errors`].
#[derive(thiserror::Error, Debug)]
pub enum WalkError {
    /// A node could not be listed or stat'ed; it was skipped.
    #[error("Traversal error: {0}")]
    Traversal(#[from] ScanError),

    /// A file's content could not be read; no entry was recorded for it.
    #[error("Read error: {0}")]
    Read(#[from] HashError),
}

impl WalkError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Traversal(e) => e.path(),
            Self::Read(e) => e.path(),
        }
    }

    /// Whether the node simply vanished between discovery and access.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Traversal(ScanError::NotFound(_)) | Self::Read(HashError::NotFound(_))
        )
    }
}

/// Fatal errors that prevent a walk from starting.
#[derive(thiserror::Error, Debug)]
pub enum WalkSetupError {
    /// The root directory is missing, unreadable or not a directory.
    #[error(transparent)]
    Root(#[from] ScanError),

    /// An exclusion pattern failed to compile.
    #[error(transparent)]
    Filter(#[from] FilterError),
}
