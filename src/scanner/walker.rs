//! Concurrent directory walker producing a [`ScanResult`].
//!
//! # Overview
//!
//! The [`Walker`] visits every node reachable from the root of a
//! [`TreeSource`] on a rayon thread pool. Each directory is listed by one
//! task and every subdirectory found spawns a new scoped task, so sibling
//! subtrees are processed in parallel with no ordering between them.
//!
//! For every visited node that is not excluded:
//! - a directory is recorded in the directory list and descended into;
//! - a regular file is hashed and recorded under its fingerprint;
//! - anything else (symlinks, devices) is skipped.
//!
//! All shared state lives in a [`ScanAccumulator`] handed to the tasks by
//! reference. File content is hashed before the accumulator's lock is
//! taken; the lock covers only the append.
//!
//! Listing and read failures are logged, recorded in
//! [`ScanResult::errors`] and the node is skipped. They never abort the
//! walk.
//!
//! # Exclusions
//!
//! An excluded file is skipped. An excluded directory loses its own entry,
//! but its children are still visited unless
//! [`WalkOptions::prune_excluded`] is set.
//!
//! # Example
//!
//! ```no_run
//! use hashdupe::scanner::{ExclusionFilter, LocalTree, WalkOptions, Walker};
//! use std::path::Path;
//!
//! let tree = LocalTree::new(Path::new("/home/user/Downloads")).unwrap();
//! let options = WalkOptions {
//!     exclusions: ExclusionFilter::new(["\\.part$"]).unwrap(),
//!     ..Default::default()
//! };
//!
//! let result = Walker::new(tree, options).walk();
//! for (fingerprint, files) in &result.files {
//!     println!("{}: {} file(s)", fingerprint, files.len());
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use super::source::{Node, NodeKind};
use super::{
    Entry, EntryKind, ExclusionFilter, Fingerprint, HashError, Hasher, LocalTree, ScanResult,
    TreeSource, WalkError, WalkSetupError,
};
use crate::progress::ProgressCallback;

/// Default number of worker threads for a walk.
pub const DEFAULT_THREADS: usize = 4;

/// Options controlling a walk.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Paths matching any of these patterns are excluded.
    pub exclusions: ExclusionFilter,

    /// Do not descend into excluded directories.
    /// When false, only the excluded directory's own entry is dropped.
    pub prune_excluded: bool,

    /// Number of worker threads (0 uses rayon's default).
    pub threads: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            exclusions: ExclusionFilter::default(),
            prune_excluded: false,
            threads: DEFAULT_THREADS,
        }
    }
}

/// Shared, lock-protected collector for the results of one walk.
///
/// Created per walk and passed explicitly to every worker task.
#[derive(Debug, Default)]
pub struct ScanAccumulator {
    files: Mutex<HashMap<Fingerprint, Vec<Entry>>>,
    directories: Mutex<Vec<Entry>>,
    errors: Mutex<Vec<WalkError>>,
    visited: AtomicUsize,
    interrupted: AtomicBool,
}

impl ScanAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry: files under their fingerprint, directories to the
    /// directory list. Returns the running count of recorded entries.
    pub fn record(&self, entry: Entry) -> usize {
        match entry.kind() {
            EntryKind::File(fingerprint) => {
                self.files.lock().entry(fingerprint).or_default().push(entry);
            }
            EntryKind::Directory => self.directories.lock().push(entry),
        }
        self.visited.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Append a non-fatal error.
    pub fn record_error(&self, error: WalkError) {
        self.errors.lock().push(error);
    }

    /// Note that a worker stopped before finishing its directory.
    pub fn mark_interrupted(&self) {
        self.interrupted.store(true, Ordering::Relaxed);
    }

    /// Consume the accumulator into the caller-owned result.
    ///
    /// The result is interrupted only if some worker actually skipped work.
    #[must_use]
    pub fn into_result(self) -> ScanResult {
        ScanResult {
            files: self.files.into_inner(),
            directories: self.directories.into_inner(),
            errors: self.errors.into_inner(),
            interrupted: self.interrupted.into_inner(),
        }
    }
}

/// Directory walker for parallel fingerprinting.
pub struct Walker<S: TreeSource> {
    source: S,
    options: WalkOptions,
    hasher: Hasher,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl<S: TreeSource> Walker<S> {
    /// Create a new walker over `source`.
    #[must_use]
    pub fn new(source: S, options: WalkOptions) -> Self {
        Self {
            source,
            options,
            hasher: Hasher::new(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// The flag is checked between node visits; a file that is already
    /// being hashed is finished first.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set a progress callback, notified once per recorded entry.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the whole tree and return the collected result.
    ///
    /// Visit order between sibling subtrees is not deterministic; per
    /// fingerprint, entries are listed in the order they were recorded.
    pub fn walk(&self) -> ScanResult {
        let start = Instant::now();
        let accumulator = ScanAccumulator::new();

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("walking", 0);
        }

        let run = || {
            rayon::scope(|scope| self.visit_directory(scope, PathBuf::new(), &accumulator));
        };

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .build()
        {
            Ok(pool) => pool.install(run),
            Err(e) => {
                log::warn!(
                    "Failed to create walker thread pool, using global pool with {} threads: {}",
                    rayon::current_num_threads(),
                    e
                );
                run();
            }
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("walking");
        }

        let result = accumulator.into_result();

        log::debug!(
            "Walk finished in {:?}: {} files under {} fingerprints, {} directories, {} errors{}",
            start.elapsed(),
            result.file_count(),
            result.files.len(),
            result.directory_count(),
            result.errors.len(),
            if result.interrupted { " (interrupted)" } else { "" }
        );

        result
    }

    /// List one directory, record its children and spawn a task per
    /// subdirectory.
    fn visit_directory<'s>(
        &'s self,
        scope: &rayon::Scope<'s>,
        dir: PathBuf,
        accumulator: &'s ScanAccumulator,
    ) {
        if self.is_shutdown_requested() {
            accumulator.mark_interrupted();
            return;
        }

        let children = match self.source.list_children(&dir) {
            Ok(children) => children,
            Err(e) => {
                self.record_error(accumulator, WalkError::Traversal(e));
                return;
            }
        };

        for child in children {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping in {}", dir.display());
                accumulator.mark_interrupted();
                return;
            }

            let node = match child {
                Ok(node) => node,
                Err(e) => {
                    self.record_error(accumulator, WalkError::Traversal(e));
                    continue;
                }
            };

            let excluded = self.options.exclusions.is_excluded(&node.path);

            match node.kind {
                NodeKind::Directory => {
                    if excluded {
                        log::trace!("Excluding directory: {}", node.path.display());
                        if self.options.prune_excluded {
                            continue;
                        }
                    } else {
                        self.record(
                            accumulator,
                            Entry::directory(node.name, node.path.clone()),
                        );
                    }

                    let path = node.path;
                    scope.spawn(move |scope| self.visit_directory(scope, path, accumulator));
                }
                NodeKind::File => {
                    if excluded {
                        log::trace!("Excluding file: {}", node.path.display());
                        continue;
                    }

                    // Hash outside the accumulator lock
                    match self.fingerprint(&node) {
                        Ok(fingerprint) => {
                            log::trace!(
                                "Hashed {} ({})",
                                node.path.display(),
                                fingerprint.short_hex(12)
                            );
                            self.record(
                                accumulator,
                                Entry::file(node.name, node.path, node.size, fingerprint),
                            );
                        }
                        Err(e) => self.record_error(accumulator, WalkError::Read(e)),
                    }
                }
                NodeKind::Other => {
                    log::trace!("Skipping non-regular file: {}", node.path.display());
                }
            }
        }
    }

    /// Read and hash one file through the source.
    fn fingerprint(&self, node: &Node) -> Result<Fingerprint, HashError> {
        let reader = self.source.open_content(&node.path)?;
        self.hasher
            .hash_reader(reader)
            .map_err(|e| HashError::from_io(&self.source.display_path(&node.path), e))
    }

    fn record(&self, accumulator: &ScanAccumulator, entry: Entry) {
        let path = self
            .progress_callback
            .as_ref()
            .map(|_| entry.relative_path.to_string_lossy().into_owned());
        let count = accumulator.record(entry);

        if let (Some(callback), Some(path)) = (self.progress_callback.as_ref(), path) {
            callback.on_progress(count, &path);
        }
    }

    fn record_error(&self, accumulator: &ScanAccumulator, error: WalkError) {
        if error.is_not_found() {
            log::debug!("Skipping vanished node: {}", error);
        } else {
            log::warn!("{}", error);
        }
        accumulator.record_error(error);
    }
}

/// Walk a local directory with the given exclusion patterns.
///
/// Convenience wrapper over [`LocalTree`] + [`Walker`] with default options.
///
/// # Errors
///
/// Returns [`WalkSetupError`] before any traversal when the root is not a
/// readable directory or a pattern is invalid.
pub fn walk<P: AsRef<str>>(root: &Path, patterns: &[P]) -> Result<ScanResult, WalkSetupError> {
    let exclusions = ExclusionFilter::new(patterns)?;
    let tree = LocalTree::new(root)?;
    let options = WalkOptions {
        exclusions,
        ..Default::default()
    };
    Ok(Walker::new(tree, options).walk())
}
