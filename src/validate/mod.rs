//! Environment and project validation behind `statenv check`.
//!
//! Every check is independent: each one runs regardless of what the others
//! found, and a check whose subject package is absent reports
//! [`CheckStatus::Skipped`] instead of failing.
//!
//! - [`check`] - the [`Check`] trait and result types
//! - [`environment`] - checks run inside the target interpreter
//! - [`project`] - checks of files under the project root

pub mod check;
pub mod environment;
pub mod project;

pub use check::{Check, CheckContext, CheckGroup, CheckResult, CheckStatus};

use serde::Serialize;

use crate::config::ValidationSettings;
use crate::error::Result;
use crate::shell::interrupt;
use crate::ui::UserInterface;

use environment::{PythonVersionCheck, RequiredModulesCheck, SnippetCheck, VersionFloorCheck};
use project::{
    ConfigTemplatesCheck, LogsWritableCheck, ProjectRootCheck, ReadmeCheck,
    RequirementsFilesCheck, UserConfigYamlCheck,
};

/// Which groups of checks to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSelection {
    /// Run the interpreter checks.
    pub environment: bool,
    /// Run the filesystem checks.
    pub project: bool,
}

impl Default for CheckSelection {
    fn default() -> Self {
        Self {
            environment: true,
            project: true,
        }
    }
}

/// The checks to run, in display order.
pub fn build_checks(settings: &ValidationSettings, selection: CheckSelection) -> Vec<Box<dyn Check>> {
    let mut checks: Vec<Box<dyn Check>> = Vec::new();

    if selection.environment {
        checks.push(Box::new(PythonVersionCheck));
        checks.push(Box::new(RequiredModulesCheck));
        for (module, floor) in &settings.version_floors {
            checks.push(Box::new(VersionFloorCheck::new(module, *floor)));
        }
        checks.push(Box::new(SnippetCheck::yaml_round_trip()));
        checks.push(Box::new(SnippetCheck::numpy_operations()));
        checks.push(Box::new(SnippetCheck::pandas_operations()));
    }

    if selection.project {
        checks.push(Box::new(ProjectRootCheck));
        checks.push(Box::new(RequirementsFilesCheck));
        checks.push(Box::new(ReadmeCheck));
        checks.push(Box::new(ConfigTemplatesCheck));
        checks.push(Box::new(LogsWritableCheck));
        checks.push(Box::new(UserConfigYamlCheck));
    }

    checks
}

/// Run every check and collect the results.
///
/// Stops with [`SetupError::Interrupted`](crate::SetupError::Interrupted)
/// once Ctrl-C has been pressed; the check it cut short is not reported.
pub fn run_checks(checks: &[Box<dyn Check>], ctx: &CheckContext<'_>) -> Result<ValidationReport> {
    let mut results = Vec::with_capacity(checks.len());
    for check in checks {
        let status = check.run(ctx);
        interrupt::check()?;

        let id = check.id();
        tracing::debug!("check {} -> {}", id, status);
        results.push(CheckResult {
            id,
            description: check.description(),
            group: check.group(),
            status,
        });
    }

    Ok(ValidationReport { results })
}

/// Results of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// One result per check, in run order.
    pub results: Vec<CheckResult>,
}

/// Counts by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ValidationReport {
    /// Counts by status.
    pub fn summary(&self) -> ValidationSummary {
        let count = |f: fn(&CheckStatus) -> bool| self.results.iter().filter(|r| f(&r.status)).count();
        ValidationSummary {
            total: self.results.len(),
            passed: count(|s| matches!(s, CheckStatus::Passed)),
            failed: count(|s| matches!(s, CheckStatus::Failed(_))),
            skipped: count(|s| matches!(s, CheckStatus::Skipped(_))),
        }
    }

    /// True when no check failed; skips are allowed.
    pub fn is_success(&self) -> bool {
        !self.results.iter().any(|r| r.status.is_failure())
    }

    /// Print the results through the UI.
    pub fn display(&self, ui: &mut dyn UserInterface) {
        let mut current_group = None;
        for result in &self.results {
            if current_group != Some(result.group) {
                current_group = Some(result.group);
                ui.show_header(match result.group {
                    CheckGroup::Environment => "Python Environment",
                    CheckGroup::Project => "Project Files",
                });
            }
            match &result.status {
                CheckStatus::Passed => ui.success(&result.description),
                CheckStatus::Failed(reason) => {
                    ui.error(&format!("{} - {}", result.description, reason))
                }
                CheckStatus::Skipped(reason) => {
                    ui.message(&format!("○ {} - skipped ({})", result.description, reason))
                }
            }
        }

        let summary = self.summary();
        let line = format!(
            "{} passed, {} failed, {} skipped",
            summary.passed, summary.failed, summary.skipped
        );
        if self.is_success() {
            ui.success(&line);
        } else {
            ui.error(&line);
        }
    }

    /// JSON document with every result and the counts.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct JsonOutput<'a> {
            checks: &'a [CheckResult],
            summary: ValidationSummary,
            success: bool,
        }

        serde_json::to_string_pretty(&JsonOutput {
            checks: &self.results,
            summary: self.summary(),
            success: self.is_success(),
        })
    }
}
