//! CSV export of a scan result.
//!
//! One row per entry, directories first (discovery order) then files sorted
//! by relative path. Usable as a spreadsheet inventory or, after a
//! comparison, as a list of what exists on only one side.
//!
//! # Columns
//!
//! - `FileName`: base name
//! - `RelativePath`: path below the scan root
//! - `FileSize`: bytes (0 for directories)
//! - `Type`: `File` or `Directory`
//! - `FileHash`: SHA-256 hex, empty for directories
//! - `Location`: `=>` only in the reference tree, `<=` only in the
//!   comparison tree, empty otherwise
//!
//! # Example
//!
//! ```no_run
//! use hashdupe::output::csv::CsvOutput;
//! use hashdupe::scanner;
//! use std::path::Path;
//!
//! let no_patterns: &[&str] = &[];
//! let result = scanner::walk(Path::new("."), no_patterns).unwrap();
//! CsvOutput::from_result(&result).write_to(std::io::stdout()).unwrap();
//! ```

use std::fs::File;
use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::scanner::{Entry, ScanResult};

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "FileName")]
    file_name: &'a str,
    #[serde(rename = "RelativePath")]
    relative_path: String,
    #[serde(rename = "FileSize")]
    file_size: u64,
    #[serde(rename = "Type")]
    kind: &'static str,
    #[serde(rename = "FileHash")]
    file_hash: String,
    #[serde(rename = "Location")]
    location: &'static str,
}

impl<'a> From<&'a Entry> for CsvRow<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            file_name: &entry.name,
            relative_path: entry.relative_path.to_string_lossy().into_owned(),
            file_size: entry.size,
            kind: entry.type_label(),
            file_hash: entry.fingerprint().map(|fp| fp.to_hex()).unwrap_or_default(),
            location: entry.provenance().symbol(),
        }
    }
}

/// CSV formatter over a list of entries.
pub struct CsvOutput<'a> {
    entries: Vec<&'a Entry>,
}

impl<'a> CsvOutput<'a> {
    /// Format the given entries in the given order.
    #[must_use]
    pub fn new(entries: Vec<&'a Entry>) -> Self {
        Self { entries }
    }

    /// Every entry of `result`: directories, then files sorted by path.
    #[must_use]
    pub fn from_result(result: &'a ScanResult) -> Self {
        let mut files: Vec<&Entry> = result.files.values().flatten().collect();
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        let mut entries: Vec<&Entry> = result.directories.iter().collect();
        entries.extend(files);
        Self { entries }
    }

    /// Only entries carrying a provenance tag, sorted by path.
    #[must_use]
    pub fn tagged_only(result: &'a ScanResult) -> Self {
        let mut entries: Vec<&Entry> = result
            .files
            .values()
            .flatten()
            .filter(|e| e.provenance().is_tagged())
            .collect();
        entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Self { entries }
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write header and rows to `writer`.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        if self.entries.is_empty() {
            csv_writer.write_record([
                "FileName",
                "RelativePath",
                "FileSize",
                "Type",
                "FileHash",
                "Location",
            ])?;
        }
        for entry in &self.entries {
            csv_writer.serialize(CsvRow::from(*entry))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Create (or truncate) `path` and write the CSV there.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if the file cannot be created or written.
    pub fn write_file(&self, path: &Path) -> Result<(), CsvOutputError> {
        let file = File::create(path)?;
        self.write_to(io::BufWriter::new(file))
    }

    /// Render the CSV to a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
