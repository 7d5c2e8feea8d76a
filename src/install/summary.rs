//! Aggregate result of one installer run.

use crate::requirements::PackageSpecifier;
use crate::verify::VerificationReport;

use super::outcome::InstallRecord;

/// Everything the log report and the exit code are derived from.
#[derive(Debug, Clone)]
pub struct InstallationSummary {
    /// One record per specifier, in requirements-file order.
    pub records: Vec<InstallRecord>,
    /// Import check of the critical packages.
    pub verification: VerificationReport,
    /// `pip list` output at the end of the run.
    pub package_listing: String,
}

impl InstallationSummary {
    /// Number of specifiers that installed.
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_success()).count()
    }

    /// Number of specifiers that failed or timed out.
    pub fn failed(&self) -> usize {
        self.records.len() - self.succeeded()
    }

    /// The specifiers that did not install, in order.
    pub fn failed_specifiers(&self) -> Vec<&PackageSpecifier> {
        self.records
            .iter()
            .filter(|r| !r.outcome.is_success())
            .map(|r| &r.specifier)
            .collect()
    }

    /// True only when every install succeeded and every critical package imports.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.verification.all_ok()
    }
}
