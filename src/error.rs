//! Exit codes and structured error reports.

use serde::Serialize;

use crate::signal::EXIT_CODE_INTERRUPTED;

/// Process exit codes.
///
/// - 0: completed (duplicates found, or comparison done)
/// - 1: fatal error (bad root, bad pattern, bad config)
/// - 2: scan completed and found no duplicates
/// - 3: completed, but some nodes could not be listed or read
/// - 130: interrupted by Ctrl+C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Completed normally.
    Success = 0,
    /// An unrecoverable error occurred.
    GeneralError = 1,
    /// Scan completed without finding duplicates.
    NoDuplicates = 2,
    /// Completed with non-fatal traversal or read errors.
    PartialSuccess = 3,
    /// Interrupted by the user.
    Interrupted = EXIT_CODE_INTERRUPTED as isize,
}

impl ExitCode {
    /// Numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "HD000",
            Self::GeneralError => "HD001",
            Self::NoDuplicates => "HD002",
            Self::PartialSuccess => "HD003",
            Self::Interrupted => "HD130",
        }
    }
}

/// Error report printed to stderr in `--json` mode.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// Code prefix, e.g. "HD001"
    pub code: String,
    /// Numeric exit code
    pub exit_code: i32,
    /// Error message including its context chain
    pub message: String,
    /// Whether the run was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Build a report from an application error.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
