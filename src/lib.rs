//! hashdupe - content-hash duplicate finder and tree comparer
//!
//! Walks directory trees in parallel, fingerprints every regular file with
//! SHA-256, and reports which files share content. Two walks can be compared
//! to find the contents that exist in only one of the trees; the affected
//! entries are tagged in place and can be exported as CSV or JSON.
//!
//! # Example
//!
//! ```no_run
//! use hashdupe::duplicates::find_duplicates;
//! use hashdupe::scanner;
//! use std::path::Path;
//!
//! let result = scanner::walk(Path::new("/data"), &[r"\.git"]).unwrap();
//! for group in find_duplicates(&result.files) {
//!     println!("{} x{}", group.fingerprint, group.len());
//! }
//! ```

pub mod app;
pub mod cli;
pub mod compare;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

pub use app::run_app;
