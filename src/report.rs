//! Plain-text installation log.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};

use crate::error::Result;
use crate::install::InstallationSummary;

const RULE_WIDTH: usize = 70;

/// `python-install-<YYYYMMDD_HHMMSS>.log` for the given time.
pub fn log_file_name(now: &DateTime<Local>) -> String {
    format!("python-install-{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Render the report text.
pub fn render_log(
    summary: &InstallationSummary,
    python_version: &str,
    now: &DateTime<Local>,
) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Python Package Installation Log");
    let _ = writeln!(out, "{}\n", rule);
    let _ = writeln!(out, "Date: {}", now.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Python Version: {}\n", python_version);

    let _ = writeln!(out, "Installation Summary:");
    let _ = writeln!(out, "  Successful: {}", summary.succeeded());
    let _ = writeln!(out, "  Failed: {}\n", summary.failed());

    let failed: Vec<_> = summary
        .records
        .iter()
        .filter(|r| !r.outcome.is_success())
        .collect();
    if !failed.is_empty() {
        let _ = writeln!(out, "Failed Packages:");
        for record in failed {
            let _ = writeln!(out, "  - {} ({})", record.specifier, record.outcome);
        }
        let _ = writeln!(out);
    }

    if !summary.verification.checks.is_empty() {
        let _ = writeln!(out, "Critical Packages:");
        for check in &summary.verification.checks {
            let _ = writeln!(out, "  {}", check.line());
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Installed Packages:");
    let _ = writeln!(out, "{}", rule);
    out.push_str(&summary.package_listing);
    if !summary.package_listing.ends_with('\n') {
        out.push('\n');
    }

    out
}

/// Write the report into `logs_dir`, creating it if needed.
///
/// Returns the path of the file written.
pub fn write_log(
    logs_dir: &Path,
    summary: &InstallationSummary,
    python_version: &str,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let path = logs_dir.join(log_file_name(&now));
    fs::write(&path, render_log(summary, python_version, &now))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::debug!("Wrote installation log {}", path.display());
    Ok(path)
}
