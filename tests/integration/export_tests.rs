use hashdupe::compare::compare_snapshots;
use hashdupe::duplicates::{find_duplicates, sort_by_wasted_space};
use hashdupe::error::ExitCode;
use hashdupe::output::json::{write_json, JsonCompareOutput, JsonOutput, JsonRunInfo};
use hashdupe::output::CsvOutput;
use hashdupe::scanner;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

const NO_PATTERNS: &[&str] = &[];

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn run_info(code: ExitCode) -> JsonRunInfo {
    JsonRunInfo::new(chrono::Utc::now(), Duration::from_millis(5), false, code)
}

#[test]
fn test_csv_export_of_scan() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    write(&dir.path().join("docs").join("a.txt"), b"abc");
    write(&dir.path().join("b.txt"), b"abc");

    let result = scanner::walk(dir.path(), NO_PATTERNS).unwrap();
    let out = tempdir().unwrap();
    let csv_path = out.path().join("scan.csv");

    CsvOutput::from_result(&result).write_file(&csv_path).unwrap();

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["FileName", "RelativePath", "FileSize", "Type", "FileHash", "Location"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "docs");
    assert_eq!(&rows[0][3], "Directory");
    assert_eq!(&rows[0][4], "");

    let abc = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
    let files: Vec<&csv::StringRecord> = rows.iter().filter(|r| &r[3] == "File").collect();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|r| &r[4] == abc && &r[2] == "3" && &r[5] == ""));
}

#[test]
fn test_csv_export_after_compare_has_location_tags() {
    let reference_dir = tempdir().unwrap();
    let comparison_dir = tempdir().unwrap();
    write(&reference_dir.path().join("gone.txt"), b"gone");
    write(&reference_dir.path().join("kept.txt"), b"kept");
    write(&comparison_dir.path().join("kept.txt"), b"kept");
    write(&comparison_dir.path().join("added.txt"), b"added");

    let mut reference = scanner::walk(reference_dir.path(), NO_PATTERNS).unwrap();
    let mut comparison = scanner::walk(comparison_dir.path(), NO_PATTERNS).unwrap();
    compare_snapshots(&mut reference, &mut comparison);

    let reference_csv = CsvOutput::from_result(&reference).to_string().unwrap();
    let comparison_csv = CsvOutput::from_result(&comparison).to_string().unwrap();

    assert!(reference_csv
        .lines()
        .any(|l| l.starts_with("gone.txt,") && l.ends_with(",=>")));
    assert!(reference_csv
        .lines()
        .any(|l| l.starts_with("kept.txt,") && l.ends_with(',')));
    assert!(comparison_csv
        .lines()
        .any(|l| l.starts_with("added.txt,") && l.ends_with(",<=")));
}

#[test]
fn test_json_scan_report() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("x1"), b"xx");
    write(&dir.path().join("x2"), b"xx");
    write(&dir.path().join("y"), b"y");

    let result = scanner::walk(dir.path(), NO_PATTERNS).unwrap();
    let mut groups = find_duplicates(&result.files);
    sort_by_wasted_space(&mut groups);

    let report = JsonOutput::new(dir.path(), &result, &groups, run_info(ExitCode::Success));
    let mut buffer = Vec::new();
    write_json(&report, &mut buffer, false).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    assert_eq!(value["duplicates"][0]["files"], serde_json::json!(["x1", "x2"]));
    assert_eq!(value["summary"]["total_files"], 3);
    assert_eq!(value["summary"]["duplicate_files"], 1);
    assert_eq!(value["summary"]["exit_code_name"], "HD000");
}

#[test]
fn test_json_compare_report() {
    let reference_dir = tempdir().unwrap();
    let comparison_dir = tempdir().unwrap();
    write(&reference_dir.path().join("a"), b"a");
    write(&comparison_dir.path().join("b"), b"b");

    let mut reference = scanner::walk(reference_dir.path(), NO_PATTERNS).unwrap();
    let mut comparison = scanner::walk(comparison_dir.path(), NO_PATTERNS).unwrap();
    let (_, summary) = compare_snapshots(&mut reference, &mut comparison);

    let report = JsonCompareOutput::new(
        (reference_dir.path(), &reference),
        (comparison_dir.path(), &comparison),
        &summary,
        run_info(ExitCode::Success),
    );
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["reference_only"][0]["path"], "a");
    assert_eq!(value["comparison_only"][0]["path"], "b");
    assert_eq!(value["comparison_only"][0]["location"], "comparison_only");
    assert_eq!(value["shared_fingerprints"], 0);
    assert_eq!(value["reference"]["total_files"], 1);
}
