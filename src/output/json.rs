//! JSON reports for `scan` and `compare`.
//!
//! # Scan schema
//!
//! ```json
//! {
//!   "root": "/data",
//!   "duplicates": [
//!     { "hash": "2cf24d...", "size": 5, "files": ["a.txt", "sub/b.txt"] }
//!   ],
//!   "errors": ["Permission denied: /data/private"],
//!   "summary": {
//!     "total_files": 3,
//!     "total_directories": 1,
//!     "total_size": 15,
//!     "unique_fingerprints": 2,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 5,
//!     "started_at": "2024-01-01T12:00:00Z",
//!     "duration_ms": 12,
//!     "interrupted": false,
//!     "exit_code": 0,
//!     "exit_code_name": "HD000"
//!   }
//! }
//! ```
//!
//! The compare report lists the files present on only one side, with their
//! tag, plus a summary of both walks.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compare::ComparisonSummary;
use crate::duplicates::{DuplicateGroup, DuplicateStats};
use crate::error::ExitCode;
use crate::scanner::{Entry, ProvenanceTag, ScanResult};

/// A duplicate group.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// SHA-256 hex
    pub hash: String,
    /// Size of one copy in bytes
    pub size: u64,
    /// Relative paths of every copy, sorted
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Flatten a group into hex hash, size and sorted paths.
    #[must_use]
    pub fn from_group(group: &DuplicateGroup<'_>) -> Self {
        let mut files: Vec<String> = group.files.iter().map(relative_path).collect();
        files.sort();
        Self {
            hash: group.fingerprint.to_hex(),
            size: group.size(),
            files,
        }
    }
}

/// Timing and outcome shared by both reports.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRunInfo {
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Total run time in milliseconds
    pub duration_ms: u64,
    /// Whether any walk was interrupted
    pub interrupted: bool,
    /// Numeric exit code
    pub exit_code: i32,
    /// Exit code prefix, e.g. "HD000"
    pub exit_code_name: String,
}

impl JsonRunInfo {
    /// Capture timing and outcome; durations beyond `u64` milliseconds saturate.
    #[must_use]
    pub fn new(
        started_at: DateTime<Utc>,
        duration: Duration,
        interrupted: bool,
        exit_code: ExitCode,
    ) -> Self {
        Self {
            started_at,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            interrupted,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Scan summary.
#[derive(Debug, Clone, Serialize)]
pub struct JsonScanSummary {
    /// Files fingerprinted
    pub total_files: usize,
    /// Directories recorded
    pub total_directories: usize,
    /// Bytes across all fingerprinted files
    pub total_size: u64,
    /// Distinct contents
    pub unique_fingerprints: usize,
    /// Contents held by two or more files
    pub duplicate_groups: usize,
    /// Redundant copies beyond the first of each group
    pub duplicate_files: usize,
    /// Bytes freed by keeping one copy per group
    pub reclaimable_space: u64,
    /// Timing and exit status
    #[serde(flatten)]
    pub run: JsonRunInfo,
}

/// Report for `hashdupe scan`.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Scanned root as given
    pub root: String,
    /// Duplicate groups, largest reclaimable space first
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Non-fatal walk errors
    pub errors: Vec<String>,
    /// Summary statistics
    pub summary: JsonScanSummary,
}

impl JsonOutput {
    /// Build a scan report. `groups` should already be sorted.
    #[must_use]
    pub fn new(
        root: &Path,
        result: &ScanResult,
        groups: &[DuplicateGroup<'_>],
        run: JsonRunInfo,
    ) -> Self {
        let stats = DuplicateStats::from_files(&result.files);
        Self {
            root: root.to_string_lossy().into_owned(),
            duplicates: groups.iter().map(JsonDuplicateGroup::from_group).collect(),
            errors: error_messages(result),
            summary: JsonScanSummary {
                total_files: stats.total_files,
                total_directories: result.directory_count(),
                total_size: stats.total_size,
                unique_fingerprints: stats.unique_fingerprints,
                duplicate_groups: stats.duplicate_groups,
                duplicate_files: stats.duplicate_files,
                reclaimable_space: stats.reclaimable_space,
                run,
            },
        }
    }
}

/// A file present on only one side of a comparison.
#[derive(Debug, Clone, Serialize)]
pub struct JsonTaggedFile {
    /// Path below its root
    pub path: String,
    /// SHA-256 hex
    pub hash: String,
    /// Size in bytes
    pub size: u64,
    /// `=>` or `<=`
    pub location: ProvenanceTag,
}

/// Per-side totals in a compare report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonTreeSummary {
    /// Walked root as given
    pub root: String,
    /// Files fingerprinted
    pub total_files: usize,
    /// Directories recorded
    pub total_directories: usize,
    /// Bytes across all fingerprinted files
    pub total_size: u64,
    /// Non-fatal walk errors
    pub errors: Vec<String>,
}

impl JsonTreeSummary {
    fn new(root: &Path, result: &ScanResult) -> Self {
        Self {
            root: root.to_string_lossy().into_owned(),
            total_files: result.file_count(),
            total_directories: result.directory_count(),
            total_size: result.total_size(),
            errors: error_messages(result),
        }
    }
}

/// Report for `hashdupe compare`.
#[derive(Debug, Clone, Serialize)]
pub struct JsonCompareOutput {
    /// Totals for the reference walk
    pub reference: JsonTreeSummary,
    /// Totals for the comparison walk
    pub comparison: JsonTreeSummary,
    /// Files whose content exists only in the reference tree
    pub reference_only: Vec<JsonTaggedFile>,
    /// Files whose content exists only in the comparison tree
    pub comparison_only: Vec<JsonTaggedFile>,
    /// Fingerprints present on both sides
    pub shared_fingerprints: usize,
    /// Timing and exit status
    #[serde(flatten)]
    pub run: JsonRunInfo,
}

impl JsonCompareOutput {
    /// Build a compare report from two annotated results.
    #[must_use]
    pub fn new(
        (reference_root, reference): (&Path, &ScanResult),
        (comparison_root, comparison): (&Path, &ScanResult),
        summary: &ComparisonSummary,
        run: JsonRunInfo,
    ) -> Self {
        Self {
            reference: JsonTreeSummary::new(reference_root, reference),
            comparison: JsonTreeSummary::new(comparison_root, comparison),
            reference_only: tagged_files(reference),
            comparison_only: tagged_files(comparison),
            shared_fingerprints: summary.shared,
            run,
        }
    }
}

/// Errors from JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// serde_json could not encode the report
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The writer failed
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}

/// Write any report as JSON followed by a newline.
///
/// # Errors
///
/// Returns `JsonOutputError` if serialization or writing fails.
pub fn write_json<T: Serialize, W: Write>(
    report: &T,
    writer: &mut W,
    pretty: bool,
) -> Result<(), JsonOutputError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, report)?;
    } else {
        serde_json::to_writer(&mut *writer, report)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

fn relative_path(entry: &Entry) -> String {
    entry.relative_path.to_string_lossy().into_owned()
}

fn error_messages(result: &ScanResult) -> Vec<String> {
    result.errors.iter().map(ToString::to_string).collect()
}

fn tagged_files(result: &ScanResult) -> Vec<JsonTaggedFile> {
    let mut files: Vec<JsonTaggedFile> = result
        .files
        .iter()
        .flat_map(|(fp, entries)| entries.iter().map(move |e| (fp, e)))
        .filter(|(_, e)| e.provenance().is_tagged())
        .map(|(fp, e)| JsonTaggedFile {
            path: relative_path(e),
            hash: fp.to_hex(),
            size: e.size,
            location: e.provenance(),
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}
