//! Output formatters for scan and compare results.
//!
//! - CSV: one row per entry, for spreadsheets and diffing tools
//! - JSON: duplicate and comparison reports for scripting
//!
//! # Example
//!
//! ```no_run
//! use hashdupe::duplicates::find_duplicates;
//! use hashdupe::error::ExitCode;
//! use hashdupe::output::json::{write_json, JsonOutput, JsonRunInfo};
//! use hashdupe::scanner;
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let no_patterns: &[&str] = &[];
//! let result = scanner::walk(Path::new("."), no_patterns).unwrap();
//! let groups = find_duplicates(&result.files);
//! let run = JsonRunInfo::new(chrono::Utc::now(), Duration::ZERO, false, ExitCode::Success);
//!
//! let report = JsonOutput::new(Path::new("."), &result, &groups, run);
//! write_json(&report, &mut std::io::stdout(), true).unwrap();
//! ```

pub mod csv;
pub mod json;

pub use self::csv::{CsvOutput, CsvOutputError};
pub use self::json::{write_json, JsonCompareOutput, JsonOutput, JsonOutputError, JsonRunInfo};
