use hashdupe::duplicates::{find_duplicates, sort_by_wasted_space, DuplicateStats};
use hashdupe::scanner::{
    self, hash_bytes, ExclusionFilter, LocalTree, ScanResult, WalkOptions, Walker,
};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const NO_PATTERNS: &[&str] = &[];

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn file_paths(result: &ScanResult) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = result
        .files
        .values()
        .flatten()
        .map(|e| e.relative_path.clone())
        .collect();
    paths.sort();
    paths
}

fn dir_paths(result: &ScanResult) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = result
        .directories
        .iter()
        .map(|e| e.relative_path.clone())
        .collect();
    paths.sort();
    paths
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let result = scanner::walk(dir.path(), NO_PATTERNS).unwrap();

    assert!(result.files.is_empty());
    assert!(result.directories.is_empty());
    assert!(result.errors.is_empty());
    assert!(!result.interrupted);
    assert!(find_duplicates(&result.files).is_empty());
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"content a");
    write(&dir.path().join("b.txt"), b"content b");
    write(&dir.path().join("c.txt"), b"content c");

    let result = scanner::walk(dir.path(), NO_PATTERNS).unwrap();

    assert_eq!(result.file_count(), 3);
    assert_eq!(result.files.len(), 3);
    assert!(find_duplicates(&result.files).is_empty());
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"duplicate");
    write(&dir.path().join("b.txt"), b"duplicate");
    write(&dir.path().join("c.txt"), b"unique");

    let result = scanner::walk(dir.path(), NO_PATTERNS).unwrap();
    let groups = find_duplicates(&result.files);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(*groups[0].fingerprint, hash_bytes(b"duplicate"));

    let stats = DuplicateStats::from_files(&result.files);
    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.duplicate_groups, 1);
    assert_eq!(stats.duplicate_files, 1);
    assert_eq!(stats.reclaimable_space, 9);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    let deep = sub.join("deep");
    fs::create_dir_all(&deep).unwrap();

    write(&dir.path().join("a.txt"), b"same");
    write(&sub.join("b.txt"), b"same");
    write(&deep.join("c.txt"), b"same");

    let result = scanner::walk(dir.path(), NO_PATTERNS).unwrap();

    assert_eq!(
        dir_paths(&result),
        vec![PathBuf::from("subdir"), Path::new("subdir").join("deep")]
    );
    assert_eq!(
        file_paths(&result),
        vec![
            PathBuf::from("a.txt"),
            Path::new("subdir").join("b.txt"),
            Path::new("subdir").join("deep").join("c.txt"),
        ]
    );
    assert_eq!(result.files[&hash_bytes(b"same")].len(), 3);
}

#[test]
fn test_file_names_do_not_affect_fingerprint() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("report-final.pdf"), b"%PDF");
    write(&dir.path().join("copy of report.pdf"), b"%PDF");

    let result = scanner::walk(dir.path(), NO_PATTERNS).unwrap();
    assert_eq!(result.files.len(), 1);
}

#[test]
fn test_empty_files_share_the_empty_fingerprint() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"");
    write(&dir.path().join("b"), b"");

    let result = scanner::walk(dir.path(), NO_PATTERNS).unwrap();
    let entries = &result.files[&hash_bytes(b"")];
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.size == 0));
}

#[test]
fn test_directories_never_in_fingerprint_map() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("empty")).unwrap();
    write(&dir.path().join("f"), b"x");

    let result = scanner::walk(dir.path(), NO_PATTERNS).unwrap();

    assert!(result.entries().filter(|e| e.is_directory()).count() == 0);
    assert_eq!(result.directories.len(), 1);
    assert!(result.directories[0].fingerprint().is_none());
    assert_eq!(result.directories[0].size, 0);
}

#[test]
fn test_excluded_directory_keeps_descendants_by_default() {
    let dir = tempdir().unwrap();
    let build = dir.path().join("build");
    fs::create_dir(&build).unwrap();
    write(&build.join("out.o"), b"object");

    let result = scanner::walk(dir.path(), &["build$"]).unwrap();

    assert!(dir_paths(&result).is_empty());
    assert_eq!(file_paths(&result), vec![Path::new("build").join("out.o")]);
}

#[test]
fn test_exclusion_matches_anywhere_in_path() {
    let dir = tempdir().unwrap();
    let git = dir.path().join(".git");
    fs::create_dir(&git).unwrap();
    write(&git.join("HEAD"), b"ref");
    write(&dir.path().join("main.rs"), b"fn main() {}");

    let result = scanner::walk(dir.path(), &[r"\.git"]).unwrap();

    assert_eq!(file_paths(&result), vec![PathBuf::from("main.rs")]);
    assert!(result.directories.is_empty());
}

#[test]
fn test_prune_excluded_skips_subtree() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("cache");
    fs::create_dir_all(cache.join("inner")).unwrap();
    write(&cache.join("inner").join("blob"), b"cached");
    write(&dir.path().join("keep.txt"), b"keep");

    let options = WalkOptions {
        exclusions: ExclusionFilter::new(["^cache$"]).unwrap(),
        prune_excluded: true,
        ..Default::default()
    };
    let result = Walker::new(LocalTree::new(dir.path()).unwrap(), options).walk();

    assert_eq!(file_paths(&result), vec![PathBuf::from("keep.txt")]);
    assert!(result.directories.is_empty());
}

#[test]
fn test_repeated_walks_are_equivalent() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        let sub = dir.path().join(format!("d{}", i % 4));
        fs::create_dir_all(&sub).unwrap();
        write(&sub.join(format!("f{}", i)), format!("c{}", i % 7).as_bytes());
    }

    let as_multisets = |r: &ScanResult| -> HashMap<_, Vec<PathBuf>> {
        r.files
            .iter()
            .map(|(fp, entries)| {
                let mut paths: Vec<PathBuf> =
                    entries.iter().map(|e| e.relative_path.clone()).collect();
                paths.sort();
                (*fp, paths)
            })
            .collect()
    };

    let first = scanner::walk(dir.path(), NO_PATTERNS).unwrap();
    let second = scanner::walk(dir.path(), NO_PATTERNS).unwrap();

    assert_eq!(first.fingerprints(), second.fingerprints());
    assert_eq!(as_multisets(&first), as_multisets(&second));
    assert_eq!(dir_paths(&first), dir_paths(&second));
}

#[test]
fn test_groups_sorted_by_wasted_space() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("small1"), b"ab");
    write(&dir.path().join("small2"), b"ab");
    write(&dir.path().join("big1"), &[7u8; 4096]);
    write(&dir.path().join("big2"), &[7u8; 4096]);
    write(&dir.path().join("big3"), &[7u8; 4096]);

    let result = scanner::walk(dir.path(), NO_PATTERNS).unwrap();
    let mut groups = find_duplicates(&result.files);
    sort_by_wasted_space(&mut groups);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].wasted_space(), 8192);
    assert_eq!(groups[1].wasted_space(), 2);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("real");
    fs::create_dir(&target).unwrap();
    write(&target.join("data"), b"data");
    std::os::unix::fs::symlink(&target, dir.path().join("link")).unwrap();
    std::os::unix::fs::symlink(target.join("data"), dir.path().join("data-link")).unwrap();

    let result = scanner::walk(dir.path(), NO_PATTERNS).unwrap();

    assert_eq!(file_paths(&result), vec![Path::new("real").join("data")]);
    assert_eq!(dir_paths(&result), vec![PathBuf::from("real")]);
}
