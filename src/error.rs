//! Structured error handling and exit codes.

use serde::Serialize;

use crate::signal::EXIT_CODE_INTERRUPTED;

/// Exit codes for the twintrim application.
///
/// - 0: Success (every duplicate group was handled)
/// - 1: General error (unexpected failure)
/// - 2: Invalid configuration (nothing was scanned)
/// - 3: Partial success (some files could not be classified or removed)
/// - 130: Interrupted by user (Ctrl+C outside a prompt)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the run completed without per-file errors.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Invalid configuration: options or root path were rejected.
    InvalidConfiguration = 2,
    /// Partial success: the run completed but some files failed.
    PartialSuccess = 3,
    /// Interrupted: the process was stopped with Ctrl+C.
    Interrupted = EXIT_CODE_INTERRUPTED as isize,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "TT000",
            Self::GeneralError => "TT001",
            Self::InvalidConfiguration => "TT002",
            Self::PartialSuccess => "TT003",
            Self::Interrupted => "TT130",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "TT002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Messages of the underlying causes, outermost first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            causes: err.chain().skip(1).map(ToString::to_string).collect(),
        }
    }
}
