//! Symmetric difference of two fingerprint snapshots.

use std::collections::{HashMap, HashSet};

use crate::scanner::{Fingerprint, ProvenanceTag};

/// Fingerprints found on exactly one side, tagged with that side.
pub type DiffTags = HashMap<Fingerprint, ProvenanceTag>;

/// Compute the symmetric difference of `reference` and `comparison`.
///
/// - present only in `comparison` → [`ProvenanceTag::ComparisonOnly`]
/// - present only in `reference` → [`ProvenanceTag::ReferenceOnly`]
/// - present in both → absent from the result
///
/// Inputs are treated as sets: order and repeats do not matter. Two empty
/// inputs give an empty result.
///
/// # Example
///
/// ```
/// use hashdupe::compare::diff;
/// use hashdupe::scanner::{hash_bytes, ProvenanceTag};
///
/// let (f1, f2, f3) = (hash_bytes(b"1"), hash_bytes(b"2"), hash_bytes(b"3"));
/// let tags = diff(&[f1, f2], &[f2, f3]);
///
/// assert_eq!(tags.len(), 2);
/// assert_eq!(tags[&f1], ProvenanceTag::ReferenceOnly);
/// assert_eq!(tags[&f3], ProvenanceTag::ComparisonOnly);
/// assert!(!tags.contains_key(&f2));
/// ```
pub fn diff<'a, R, C>(reference: R, comparison: C) -> DiffTags
where
    R: IntoIterator<Item = &'a Fingerprint>,
    C: IntoIterator<Item = &'a Fingerprint>,
{
    let reference: HashSet<&Fingerprint> = reference.into_iter().collect();
    let comparison: HashSet<&Fingerprint> = comparison.into_iter().collect();

    let comparison_only = comparison
        .difference(&reference)
        .map(|fp| (**fp, ProvenanceTag::ComparisonOnly));
    let reference_only = reference
        .difference(&comparison)
        .map(|fp| (**fp, ProvenanceTag::ReferenceOnly));

    comparison_only.chain(reference_only).collect()
}
