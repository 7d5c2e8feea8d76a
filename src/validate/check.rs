//! Check definitions.
//!
//! - [`Check`] - the trait every environment and project check implements
//! - [`CheckStatus`] - passed, failed with a reason, or skipped with a reason
//! - [`CheckContext`] - what a check may look at

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::config::ValidationSettings;
use crate::python::{Interpreter, SKIP_EXIT_CODE};
use crate::shell::CommandResult;

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum CheckStatus {
    /// The expectation holds.
    Passed,
    /// The expectation does not hold.
    Failed(String),
    /// The subject of the check is absent, so it could not run.
    Skipped(String),
}

impl CheckStatus {
    /// Whether this status counts against the run.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Build a status from whether `condition` holds.
    pub fn expect(condition: bool, reason: impl FnOnce() -> String) -> Self {
        if condition {
            Self::Passed
        } else {
            Self::Failed(reason())
        }
    }

    /// Classify a snippet run under the skip-exit-code convention.
    ///
    /// `subject` names the module whose absence makes the check skip.
    pub fn from_snippet(result: &CommandResult, subject: &str) -> Self {
        if result.success {
            Self::Passed
        } else if result.exit_code == Some(SKIP_EXIT_CODE) {
            Self::Skipped(format!("{} not installed", subject))
        } else {
            let diagnostic = result.diagnostic();
            let last = diagnostic.lines().last().unwrap_or_default().trim();
            if last.is_empty() {
                Self::Failed(format!("snippet exited with {:?}", result.exit_code))
            } else {
                Self::Failed(last.to_string())
            }
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
            Self::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

/// Which batch a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckGroup {
    /// Checks run inside the target interpreter.
    Environment,
    /// Checks of the project's files on disk.
    Project,
}

/// Everything a check may inspect.
pub struct CheckContext<'a> {
    /// Root of the analysis project.
    pub project_root: &'a Path,
    /// Interpreter the environment checks run in.
    pub interpreter: &'a dyn Interpreter,
    /// Version floors and module lists.
    pub settings: &'a ValidationSettings,
}

/// A single independent check.
pub trait Check {
    /// Stable identifier, used in JSON output.
    ///
    /// Unique within one run.
    fn id(&self) -> String;

    /// One-line human description.
    fn description(&self) -> String;

    /// Which batch the check belongs to.
    fn group(&self) -> CheckGroup;

    /// Run the check.
    fn run(&self, ctx: &CheckContext<'_>) -> CheckStatus;
}

/// Result of running one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// The check's identifier.
    pub id: String,
    /// The check's description.
    pub description: String,
    /// Which batch it ran in.
    pub group: CheckGroup,
    /// What happened.
    #[serde(flatten)]
    pub status: CheckStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn snippet_success_passes() {
        let r = CommandResult::success(String::new(), String::new(), Duration::ZERO);
        assert_eq!(CheckStatus::from_snippet(&r, "numpy"), CheckStatus::Passed);
    }

    #[test]
    fn snippet_skip_code_skips() {
        let r = CommandResult::failure(Some(SKIP_EXIT_CODE), String::new(), String::new(), Duration::ZERO);
        assert_eq!(
            CheckStatus::from_snippet(&r, "pandas"),
            CheckStatus::Skipped("pandas not installed".into())
        );
    }

    #[test]
    fn snippet_failure_reports_last_line() {
        let stderr = "Traceback (most recent call last):\n  File \"<string>\", line 7\nAssertionError: mean was 2.5\n";
        let r = CommandResult::failure(Some(1), String::new(), stderr.into(), Duration::ZERO);
        assert_eq!(
            CheckStatus::from_snippet(&r, "numpy"),
            CheckStatus::Failed("AssertionError: mean was 2.5".into())
        );
    }

    #[test]
    fn expect_builds_reason_lazily() {
        assert_eq!(CheckStatus::expect(true, || unreachable!()), CheckStatus::Passed);
        assert_eq!(
            CheckStatus::expect(false, || "missing".into()),
            CheckStatus::Failed("missing".into())
        );
    }

    #[test]
    fn only_failed_is_failure() {
        assert!(!CheckStatus::Passed.is_failure());
        assert!(!CheckStatus::Skipped("x".into()).is_failure());
        assert!(CheckStatus::Failed("x".into()).is_failure());
    }

    #[test]
    fn status_serializes_with_reason() {
        let json = serde_json::to_value(CheckStatus::Failed("too old".into())).unwrap();
        assert_eq!(json, serde_json::json!({"status": "failed", "reason": "too old"}));

        let json = serde_json::to_value(CheckStatus::Passed).unwrap();
        assert_eq!(json, serde_json::json!({"status": "passed"}));
    }
}
