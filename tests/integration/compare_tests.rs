use hashdupe::compare::{compare_snapshots, diff};
use hashdupe::scanner::{self, hash_bytes, ProvenanceTag, ScanResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

const NO_PATTERNS: &[&str] = &[];

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn tag_of(result: &ScanResult, name: &str) -> ProvenanceTag {
    result
        .entries()
        .find(|e| e.name == name)
        .map(|e| e.provenance())
        .unwrap_or_else(|| panic!("no entry named {}", name))
}

#[test]
fn test_compare_tags_one_sided_contents() {
    let reference = tempdir().unwrap();
    let comparison = tempdir().unwrap();

    write(&reference.path().join("only-backup.txt"), b"old data");
    write(&reference.path().join("shared.txt"), b"same");
    write(&comparison.path().join("moved/shared-renamed.txt"), b"same");
    write(&comparison.path().join("only-live.txt"), b"new data");

    let mut reference = scanner::walk(reference.path(), NO_PATTERNS).unwrap();
    let mut comparison = scanner::walk(comparison.path(), NO_PATTERNS).unwrap();

    let (tags, summary) = compare_snapshots(&mut reference, &mut comparison);

    assert_eq!(tags.len(), 2);
    assert_eq!(tags[&hash_bytes(b"old data")], ProvenanceTag::ReferenceOnly);
    assert_eq!(tags[&hash_bytes(b"new data")], ProvenanceTag::ComparisonOnly);
    assert_eq!(summary.shared, 1);
    assert_eq!(summary.tagged_entries, 2);

    assert_eq!(tag_of(&reference, "only-backup.txt"), ProvenanceTag::ReferenceOnly);
    assert_eq!(tag_of(&reference, "shared.txt"), ProvenanceTag::None);
    assert_eq!(tag_of(&comparison, "shared-renamed.txt"), ProvenanceTag::None);
    assert_eq!(tag_of(&comparison, "only-live.txt"), ProvenanceTag::ComparisonOnly);
    assert!(comparison
        .directories
        .iter()
        .all(|d| d.provenance() == ProvenanceTag::None));
}

#[test]
fn test_compare_tree_with_itself_is_identical() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"1");
    write(&dir.path().join("sub/b"), b"2");

    let mut first = scanner::walk(dir.path(), NO_PATTERNS).unwrap();
    let mut second = scanner::walk(dir.path(), NO_PATTERNS).unwrap();

    let (tags, summary) = compare_snapshots(&mut first, &mut second);

    assert!(tags.is_empty());
    assert!(summary.is_identical());
    assert!(first.entries().all(|e| !e.provenance().is_tagged()));
}

#[test]
fn test_compare_against_empty_tree() {
    let full = tempdir().unwrap();
    let empty = tempdir().unwrap();
    write(&full.path().join("x"), b"x");
    write(&full.path().join("y"), b"x");

    let mut reference = scanner::walk(empty.path(), NO_PATTERNS).unwrap();
    let mut comparison = scanner::walk(full.path(), NO_PATTERNS).unwrap();

    let (tags, summary) = compare_snapshots(&mut reference, &mut comparison);

    assert_eq!(tags.len(), 1);
    assert_eq!(summary.comparison_only, 1);
    assert_eq!(summary.tagged_entries, 2);
    assert!(comparison
        .entries()
        .all(|e| e.provenance() == ProvenanceTag::ComparisonOnly));
}

#[test]
fn test_modified_file_appears_on_both_sides() {
    let before = tempdir().unwrap();
    let after = tempdir().unwrap();
    write(&before.path().join("notes.txt"), b"draft 1");
    write(&after.path().join("notes.txt"), b"draft 2");

    let mut reference = scanner::walk(before.path(), NO_PATTERNS).unwrap();
    let mut comparison = scanner::walk(after.path(), NO_PATTERNS).unwrap();
    compare_snapshots(&mut reference, &mut comparison);

    assert_eq!(tag_of(&reference, "notes.txt"), ProvenanceTag::ReferenceOnly);
    assert_eq!(tag_of(&comparison, "notes.txt"), ProvenanceTag::ComparisonOnly);
}

#[test]
fn test_diff_matches_fingerprint_sets() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(&left.path().join("a"), b"f1");
    write(&left.path().join("b"), b"f2");
    write(&right.path().join("c"), b"f2");
    write(&right.path().join("d"), b"f3");

    let reference = scanner::walk(left.path(), NO_PATTERNS).unwrap();
    let comparison = scanner::walk(right.path(), NO_PATTERNS).unwrap();

    let tags = diff(&reference.fingerprints(), &comparison.fingerprints());

    assert_eq!(tags.len(), 2);
    assert_eq!(tags[&hash_bytes(b"f1")], ProvenanceTag::ReferenceOnly);
    assert_eq!(tags[&hash_bytes(b"f3")], ProvenanceTag::ComparisonOnly);
}
