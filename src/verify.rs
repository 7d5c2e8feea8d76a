//! Import check of the critical packages after installation.

use serde::Serialize;

use crate::config::CriticalPackage;
use crate::error::{Result, SetupError};
use crate::python::Interpreter;
use crate::shell::interrupt;
use crate::ui::UserInterface;

/// Result of importing one critical package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageCheck {
    /// Distribution name, as shown to the user.
    pub name: String,
    /// Whether the import succeeded.
    pub imported: bool,
}

impl PackageCheck {
    /// The line shown on screen and written to the log.
    pub fn line(&self) -> String {
        if self.imported {
            format!("✓ {}", self.name)
        } else {
            format!("✗ {} - FAILED TO LOAD", self.name)
        }
    }
}

/// Per-package import results, in allowlist order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// One entry per critical package.
    pub checks: Vec<PackageCheck>,
}

impl VerificationReport {
    /// True when every critical package imported.
    pub fn all_ok(&self) -> bool {
        self.checks.iter().all(|c| c.imported)
    }

    /// Names of the packages that failed to import.
    pub fn failures(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.imported)
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Try to import every critical package; never stops at the first failure.
pub fn verify_critical(
    packages: &[CriticalPackage],
    interpreter: &dyn Interpreter,
    ui: &mut dyn UserInterface,
) -> Result<VerificationReport> {
    ui.show_header("Verifying Installation");

    let mut checks = Vec::with_capacity(packages.len());
    for package in packages {
        interrupt::check()?;

        let imported = match interpreter.can_import(package.import_name()) {
            Ok(imported) => imported,
            Err(SetupError::Interrupted) => return Err(SetupError::Interrupted),
            Err(e) => {
                tracing::warn!("Could not import {}: {}", package.import_name(), e);
                false
            }
        };
        tracing::debug!(
            "import {} ({}) -> {}",
            package.import_name(),
            package.name,
            imported
        );

        let check = PackageCheck {
            name: package.name.clone(),
            imported,
        };
        if imported {
            ui.success(&package.name);
        } else {
            ui.error(&format!("{} - FAILED TO LOAD", package.name));
        }
        checks.push(check);
    }

    Ok(VerificationReport { checks })
}
