//! Filesystem abstraction consumed by the walker.
//!
//! The walker never touches `std::fs` directly. It asks a [`TreeSource`] to
//! list the children of a directory and to open the content of a file, both
//! addressed by paths relative to the scan root (the empty path is the root
//! itself). [`LocalTree`] is the on-disk implementation.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{HashError, ScanError};

/// Classification of a child node as reported by a [`TreeSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A regular file whose content can be hashed.
    File,
    /// A directory that can be descended into.
    Directory,
    /// Anything else (symlink, socket, device, fifo). Never hashed or followed.
    Other,
}

/// A child node discovered while listing a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Base name of the node.
    pub name: String,
    /// Path relative to the scan root.
    pub path: PathBuf,
    /// File, directory or other.
    pub kind: NodeKind,
    /// Size in bytes (0 for directories).
    pub size: u64,
}

/// A single listed child, or the error that prevented classifying it.
pub type ChildResult = Result<Node, ScanError>;

/// Read-only view of a directory tree.
///
/// Implementations must be shareable across the walker's worker threads.
pub trait TreeSource: Send + Sync {
    /// List the children of `dir` (relative to the root).
    ///
    /// An `Err` means the directory itself could not be listed. Individual
    /// children that fail to stat are returned as `Err` items.
    fn list_children(&self, dir: &Path) -> Result<Vec<ChildResult>, ScanError>;

    /// Open the full content of the file at `path` (relative to the root).
    fn open_content(&self, path: &Path) -> Result<Box<dyn Read + Send + '_>, HashError>;

    /// Path to show in errors and logs for a relative path.
    fn display_path(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// A directory tree on the local filesystem.
///
/// Symbolic links are reported as [`NodeKind::Other`] and never followed.
#[derive(Debug, Clone)]
pub struct LocalTree {
    root: PathBuf,
}

impl LocalTree {
    /// Open a local tree rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] / [`ScanError::PermissionDenied`] when
    /// the root cannot be stat'ed, and [`ScanError::NotADirectory`] when it
    /// is not a directory.
    pub fn new(root: &Path) -> Result<Self, ScanError> {
        let metadata = fs::metadata(root).map_err(|e| ScanError::from_io(root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Root directory of this tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

impl TreeSource for LocalTree {
    fn list_children(&self, dir: &Path) -> Result<Vec<ChildResult>, ScanError> {
        let full = self.resolve(dir);
        let read_dir = fs::read_dir(&full).map_err(|e| ScanError::from_io(&full, e))?;

        let children = read_dir
            .map(|item| {
                let item = item.map_err(|e| ScanError::from_io(&full, e))?;
                let name = item.file_name();
                // DirEntry::metadata does not traverse symlinks
                let metadata = item
                    .metadata()
                    .map_err(|e| ScanError::from_io(&item.path(), e))?;
                let file_type = metadata.file_type();

                let (kind, size) = if file_type.is_dir() {
                    (NodeKind::Directory, 0)
                } else if file_type.is_file() {
                    (NodeKind::File, metadata.len())
                } else {
                    (NodeKind::Other, 0)
                };

                Ok(Node {
                    name: name.to_string_lossy().into_owned(),
                    path: dir.join(&name),
                    kind,
                    size,
                })
            })
            .collect();

        Ok(children)
    }

    fn open_content(&self, path: &Path) -> Result<Box<dyn Read + Send + '_>, HashError> {
        let full = self.resolve(path);
        let file = File::open(&full).map_err(|e| HashError::from_io(&full, e))?;
        Ok(Box::new(file))
    }

    fn display_path(&self, path: &Path) -> PathBuf {
        self.resolve(path)
    }
}
