//! Snapshot comparison.
//!
//! Two independent walks (a *reference* and a *comparison* snapshot) are
//! compared by content: [`diff`] computes which fingerprints exist on only
//! one side, and [`annotate`] writes that provenance onto the entries.
//!
//! # Example
//!
//! ```no_run
//! use hashdupe::compare::compare_snapshots;
//! use hashdupe::scanner;
//! use std::path::Path;
//!
//! let no_patterns: &[&str] = &[];
//! let mut reference = scanner::walk(Path::new("/backup"), no_patterns).unwrap();
//! let mut comparison = scanner::walk(Path::new("/live"), no_patterns).unwrap();
//!
//! let (_tags, summary) = compare_snapshots(&mut reference, &mut comparison);
//! println!(
//!     "{} only in backup, {} only in live",
//!     summary.reference_only, summary.comparison_only
//! );
//! ```

pub mod annotate;
pub mod diff;

pub use annotate::{annotate, compare_snapshots, ComparisonSummary};
pub use diff::{diff, DiffTags};
