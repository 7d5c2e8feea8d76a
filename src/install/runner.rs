//! Sequential package installation.

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::requirements::PackageSpecifier;
use crate::shell::interrupt;
use crate::ui::{format_duration, OutputMode, UserInterface};

use super::outcome::{InstallOutcome, InstallRecord};
use super::pip::PackageManager;

/// Upgrade the package manager; a failure is only a warning.
///
/// Returns whether the upgrade succeeded.
pub fn upgrade_package_manager(
    manager: &dyn PackageManager,
    ui: &mut dyn UserInterface,
) -> Result<bool> {
    ui.show_header("Upgrading pip");
    let mut spinner = ui.start_spinner("Upgrading pip");

    match InstallOutcome::from_result(manager.upgrade_self())? {
        InstallOutcome::Succeeded => {
            spinner.finish_success("pip upgraded successfully");
            Ok(true)
        }
        outcome => {
            let reason = outcome.reason().unwrap_or_default().to_string();
            tracing::warn!("pip upgrade failed: {}", reason);
            spinner.finish_error("pip upgrade failed");
            ui.warning(&format!("Could not upgrade pip: {}", first_line(&reason)));
            Ok(false)
        }
    }
}

/// Install each specifier in order, one at a time.
///
/// Returns exactly one record per specifier, in input order. A failing
/// specifier never stops the batch; only an interrupt does.
pub fn install_all(
    specs: &[PackageSpecifier],
    manager: &dyn PackageManager,
    timeout: Duration,
    ui: &mut dyn UserInterface,
) -> Result<Vec<InstallRecord>> {
    let total = specs.len();
    ui.show_header(&format!("Installing {} Packages", total));

    let mut records = Vec::with_capacity(total);

    for (index, spec) in specs.iter().enumerate() {
        interrupt::check()?;

        let label = format!("[{}/{}] Installing {}", index + 1, total, spec);
        let mut spinner = ui.start_spinner(&label);
        let start = Instant::now();

        let outcome = match InstallOutcome::from_result(manager.install(spec, timeout)) {
            Ok(outcome) => outcome,
            Err(e) => {
                spinner.finish_error(&format!("{} (interrupted)", label));
                return Err(e);
            }
        };
        let duration = start.elapsed();

        match &outcome {
            InstallOutcome::Succeeded => {
                spinner.finish_success(&format!("{} ({})", label, format_duration(duration)));
            }
            InstallOutcome::TimedOut => {
                spinner.finish_error(&format!("{} (timeout)", label));
            }
            InstallOutcome::Failed(reason) => {
                spinner.finish_error(&label);
                if ui.output_mode() == OutputMode::Verbose {
                    ui.message(reason);
                }
            }
        }
        tracing::debug!("{} -> {} in {:?}", spec, outcome, duration);

        records.push(InstallRecord {
            specifier: spec.clone(),
            outcome,
            duration,
        });
    }

    Ok(records)
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
