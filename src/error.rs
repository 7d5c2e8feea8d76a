//! Error types for statenv operations.
//!
//! This module defines [`SetupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Per-package install failures are never errors; they are recorded as
//!   [`InstallOutcome`](crate::install::InstallOutcome) values
//! - Use `SetupError` for failures that stop the run
//! - Use `anyhow::Error` (via `SetupError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::python::Version;

/// Exit code for a clean run.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for failed installs, failed checks and unexpected errors.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code when the user interrupts the run (SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// Core error type for statenv operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The requirements file does not exist.
    #[error("{} not found", path.display())]
    RequirementsNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The interpreter is older than the configured minimum.
    #[error("Python {required} or higher is required (current version: {found})")]
    InterpreterTooOld {
        found: Version,
        required: Version,
    },

    /// The interpreter could not be run or described itself in an unexpected way.
    #[error("Could not inspect Python interpreter '{python}': {message}")]
    InterpreterInspectFailed { python: String, message: String },

    /// A child process could not be started or waited on.
    #[error("Command failed to run: {command}")]
    CommandFailed { command: String },

    /// The user pressed Ctrl-C.
    #[error("Interrupted by user")]
    Interrupted,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SetupError {
    /// Process exit code for this error when it reaches `main`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => EXIT_INTERRUPTED,
            _ => EXIT_FAILURE,
        }
    }
}

/// Result type alias for statenv operations.
pub type Result<T> = std::result::Result<T, SetupError>;
