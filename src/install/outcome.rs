//! Per-package install results.

use std::fmt;
use std::time::Duration;

use crate::error::{Result, SetupError};
use crate::requirements::PackageSpecifier;
use crate::shell::CommandResult;

/// Terminal disposition of one install attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// pip exited with status 0.
    Succeeded,
    /// pip failed or could not be run; holds the diagnostic text.
    Failed(String),
    /// pip was killed after exceeding the per-package timeout.
    TimedOut,
}

impl InstallOutcome {
    /// Classify the result of an install invocation.
    ///
    /// Every error becomes a `Failed` outcome except an interrupt, which
    /// must stop the whole batch and is passed back to the caller.
    pub fn from_result(result: Result<CommandResult>) -> Result<Self> {
        match result {
            Ok(r) if r.success => Ok(Self::Succeeded),
            Ok(r) if r.timed_out => Ok(Self::TimedOut),
            Ok(r) => {
                let diagnostic = r.diagnostic();
                if diagnostic.is_empty() {
                    Ok(Self::Failed(match r.exit_code {
                        Some(code) => format!("exited with code {}", code),
                        None => "terminated by signal".to_string(),
                    }))
                } else {
                    Ok(Self::Failed(diagnostic))
                }
            }
            Err(SetupError::Interrupted) => Err(SetupError::Interrupted),
            Err(e) => Ok(Self::Failed(e.to_string())),
        }
    }

    /// Whether the package installed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Short label for display and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Succeeded => "ok",
            Self::Failed(_) => "failed",
            Self::TimedOut => "timeout",
        }
    }

    /// The failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            Self::TimedOut => Some("timed out"),
            Self::Succeeded => None,
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One specifier and what happened when installing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRecord {
    /// The specifier as read from the requirements file.
    pub specifier: PackageSpecifier,
    /// What happened.
    pub outcome: InstallOutcome,
    /// Wall-clock time of the attempt.
    pub duration: Duration,
}
