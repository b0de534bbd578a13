//! Applying diff tags back onto entries.
//!
//! Tagging works on `&mut Entry` handed out by the caller's own collections,
//! so the tags are visible through the same storage the caller reads later.

use crate::scanner::{Entry, ProvenanceTag, ScanResult};

use super::diff::{diff, DiffTags};

/// Set the provenance of every entry whose fingerprint is in `tags`.
///
/// Entries whose fingerprint is not tagged, and directories, are reset to
/// [`ProvenanceTag::None`], so each pass writes every entry exactly once.
/// Duplicate files on one side all receive the same tag, since the
/// comparison is by content. Returns the number of entries tagged.
pub fn annotate<'a, R, C>(tags: &DiffTags, reference: R, comparison: C) -> usize
where
    R: IntoIterator<Item = &'a mut Entry>,
    C: IntoIterator<Item = &'a mut Entry>,
{
    let mut tagged = 0;

    for entry in reference.into_iter().chain(comparison) {
        let tag = entry
            .fingerprint()
            .and_then(|fp| tags.get(fp))
            .copied()
            .unwrap_or_default();
        if tag.is_tagged() {
            tagged += 1;
        }
        entry.set_provenance(tag);
    }

    tagged
}

/// Outcome of comparing two scan results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSummary {
    /// Fingerprints found only in the reference snapshot
    pub reference_only: usize,
    /// Fingerprints found only in the comparison snapshot
    pub comparison_only: usize,
    /// Fingerprints found in both
    pub shared: usize,
    /// Entries (both sides) that received a tag
    pub tagged_entries: usize,
}

impl ComparisonSummary {
    /// Whether both snapshots hold exactly the same set of contents.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.reference_only == 0 && self.comparison_only == 0
    }
}

/// Diff two scan results and tag their file entries in place.
///
/// Returns the tags alongside a summary so callers can report or export
/// the fingerprints that differ.
pub fn compare_snapshots(
    reference: &mut ScanResult,
    comparison: &mut ScanResult,
) -> (DiffTags, ComparisonSummary) {
    let tags = diff(reference.files.keys(), comparison.files.keys());

    let reference_only = tags
        .values()
        .filter(|t| **t == ProvenanceTag::ReferenceOnly)
        .count();
    let comparison_only = tags.len() - reference_only;
    let shared = reference.files.len() - reference_only;

    let tagged_entries = annotate(&tags, reference.entries_mut(), comparison.entries_mut());

    log::debug!(
        "Comparison: {} reference-only, {} comparison-only, {} shared fingerprints",
        reference_only,
        comparison_only,
        shared
    );

    let summary = ComparisonSummary {
        reference_only,
        comparison_only,
        shared,
        tagged_entries,
    };
    (tags, summary)
}
