//! Duplicate grouping over a fingerprint mapping.
//!
//! # Overview
//!
//! A walk already buckets files by content fingerprint. This module is the
//! read-only view on top: every bucket holding two or more files is a
//! [`DuplicateGroup`]. Groups borrow from the mapping, so finding
//! duplicates never copies entries or touches the scan result.
//!
//! # Example
//!
//! ```
//! use hashdupe::scanner::{hash_bytes, Entry};
//! use hashdupe::duplicates::{find_duplicates, DuplicateStats};
//! use std::collections::HashMap;
//!
//! let fp = hash_bytes(b"same");
//! let mut files = HashMap::new();
//! files.insert(fp, vec![
//!     Entry::file("a.txt", "a.txt", 4, fp),
//!     Entry::file("b.txt", "copy/b.txt", 4, fp),
//! ]);
//!
//! let groups = find_duplicates(&files);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].wasted_space(), 4);
//!
//! let stats = DuplicateStats::from_files(&files);
//! assert_eq!(stats.duplicate_files, 1);
//! ```

use std::collections::HashMap;

use crate::scanner::{Entry, Fingerprint};

/// Files sharing one fingerprint, borrowed from the scan mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateGroup<'a> {
    /// Shared content fingerprint
    pub fingerprint: &'a Fingerprint,
    /// Files with this content, in discovery order
    pub files: &'a [Entry],
}

impl<'a> DuplicateGroup<'a> {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Size of one copy in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.files.first().map_or(0, |f| f.size)
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        if self.files.len() > 1 {
            self.total_size().saturating_sub(self.size())
        } else {
            0
        }
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }
}

/// Every fingerprint in `files` shared by two or more entries.
///
/// The order of groups follows the map's iteration order and is
/// unspecified; see [`sort_by_wasted_space`] for a stable presentation.
/// Member order within a group is the discovery order of the walk.
#[must_use]
pub fn find_duplicates(files: &HashMap<Fingerprint, Vec<Entry>>) -> Vec<DuplicateGroup<'_>> {
    files
        .iter()
        .filter(|(_, entries)| entries.len() > 1)
        .map(|(fingerprint, entries)| DuplicateGroup {
            fingerprint,
            files: entries,
        })
        .collect()
}

/// Order groups by wasted space (largest first), ties broken by fingerprint.
pub fn sort_by_wasted_space(groups: &mut [DuplicateGroup<'_>]) {
    groups.sort_by(|a, b| {
        b.wasted_space()
            .cmp(&a.wasted_space())
            .then_with(|| a.fingerprint.cmp(b.fingerprint))
    });
}

/// Statistics over a fingerprint mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateStats {
    /// Total number of files
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct fingerprints
    pub unique_fingerprints: usize,
    /// Number of fingerprints shared by 2+ files
    pub duplicate_groups: usize,
    /// Number of redundant copies (files beyond the first in each group)
    pub duplicate_files: usize,
    /// Bytes that removing every redundant copy would free
    pub reclaimable_space: u64,
}

impl DuplicateStats {
    /// Compute statistics for `files`.
    #[must_use]
    pub fn from_files(files: &HashMap<Fingerprint, Vec<Entry>>) -> Self {
        let mut stats = Self {
            unique_fingerprints: files.len(),
            ..Default::default()
        };

        for (fingerprint, entries) in files {
            stats.total_files += entries.len();
            let group = DuplicateGroup {
                fingerprint,
                files: entries,
            };
            stats.total_size += group.total_size();
            if group.len() > 1 {
                stats.duplicate_groups += 1;
                stats.duplicate_files += group.duplicate_count();
                stats.reclaimable_space += group.wasted_space();
            }
        }

        stats
    }

    /// Percentage of the scanned bytes that duplicates occupy.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }
}
