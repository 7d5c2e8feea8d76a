//! Install command implementation.
//!
//! The `statenv install` command (also the default) runs one pass of:
//! version check, isolation check, pip self-upgrade, requirements read,
//! sequential installs, critical import verification, log write, summary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;

use crate::cli::args::InstallArgs;
use crate::config::SetupConfig;
use crate::error::{Result, SetupError, EXIT_FAILURE};
use crate::install::{
    install_all, upgrade_package_manager, InstallRecord, InstallationSummary, PackageManager, Pip,
    LISTING_UNAVAILABLE,
};
use crate::python::{Interpreter, InterpreterInfo, PythonInterpreter};
use crate::report;
use crate::requirements::read_requirements;
use crate::ui::{Prompt, UserInterface};
use crate::verify::verify_critical;

use super::dispatcher::{Command, CommandResult};

/// Prompt key for continuing outside a virtual environment.
pub const CONTINUE_PROMPT_KEY: &str = "continue_without_venv";

/// Commands for the other ecosystems, shown after a clean run.
pub const NEXT_STEPS: [&str; 3] = [
    "Install R packages: Rscript install-r-packages.R",
    "Install Stata packages: do requirements-stata.do",
    "Run: make check",
];

/// The install command implementation.
pub struct InstallCommand {
    project_root: PathBuf,
    config: SetupConfig,
    args: InstallArgs,
    interpreter: Box<dyn Interpreter>,
    packages: Box<dyn PackageManager>,
}

impl InstallCommand {
    /// Create an install command that drives `python` and its pip.
    pub fn new(project_root: &Path, config: SetupConfig, python: &str, args: InstallArgs) -> Self {
        let interpreter = PythonInterpreter::new(python).in_dir(project_root);
        let packages = Pip::new(python).in_dir(project_root);
        Self::with_backends(
            project_root,
            config,
            args,
            Box::new(interpreter),
            Box::new(packages),
        )
    }

    /// Create an install command with explicit interpreter and package manager.
    pub fn with_backends(
        project_root: &Path,
        config: SetupConfig,
        args: InstallArgs,
        interpreter: Box<dyn Interpreter>,
        packages: Box<dyn PackageManager>,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
            args,
            interpreter,
            packages,
        }
    }

    /// Requirements file, resolved against the project root.
    pub fn requirements_path(&self) -> PathBuf {
        let path = self
            .args
            .requirements
            .as_deref()
            .unwrap_or(&self.config.requirements_file);
        self.project_root.join(path)
    }

    /// Per-package timeout: `--timeout`, else the configured one.
    pub fn timeout(&self) -> Duration {
        self.args
            .timeout
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.config.install_timeout())
    }

    fn check_version(&self, ui: &mut dyn UserInterface) -> Result<InterpreterInfo> {
        ui.show_header("Checking Python Version");

        let info = self.interpreter.info()?;
        let found = info.release();
        tracing::debug!(
            "{} is Python {} (minimum {})",
            self.interpreter.program(),
            found,
            self.config.min_python
        );

        if !found.satisfies(self.config.min_python) {
            return Err(SetupError::InterpreterTooOld {
                found,
                required: self.config.min_python,
            });
        }

        ui.success(&format!("Python version: {}", info.short_version_string()));
        Ok(info)
    }

    /// Returns false when the user declines to continue outside a virtual environment.
    fn confirm_environment(
        &self,
        info: &InterpreterInfo,
        ui: &mut dyn UserInterface,
    ) -> Result<bool> {
        if info.is_isolated() {
            ui.success("Running in virtual environment");
            ui.message(&format!("  Location: {}", info.prefix.display()));
            return Ok(true);
        }

        ui.warning("Not running in a virtual environment");
        ui.message("  Consider creating one with: python -m venv venv");
        ui.message("  Activate it before installing packages");

        if self.args.yes {
            tracing::debug!("--yes given, continuing outside a virtual environment");
            return Ok(true);
        }

        ui.confirm(&Prompt::confirm(
            CONTINUE_PROMPT_KEY,
            "Continue anyway?",
            false,
        ))
    }

    fn show_install_summary(&self, records: &[InstallRecord], ui: &mut dyn UserInterface) {
        let failed: Vec<_> = records.iter().filter(|r| !r.outcome.is_success()).collect();

        ui.show_header("Installation Summary");
        ui.message(&format!(
            "  Successful: {} packages",
            records.len() - failed.len()
        ));
        ui.message(&format!("  Failed:     {} packages", failed.len()));

        if !failed.is_empty() {
            ui.warning("Failed packages:");
            for record in failed {
                ui.message(&format!("  - {} ({})", record.specifier, record.outcome));
            }
        }
    }

    fn package_listing(&self) -> Result<String> {
        match self.packages.list_installed() {
            Ok(listing) => Ok(listing),
            Err(SetupError::Interrupted) => Err(SetupError::Interrupted),
            Err(e) => {
                tracing::warn!("Listing installed packages failed: {}", e);
                Ok(LISTING_UNAVAILABLE.to_string())
            }
        }
    }

    fn write_log(
        &self,
        summary: &InstallationSummary,
        info: &InterpreterInfo,
        ui: &mut dyn UserInterface,
    ) -> Option<PathBuf> {
        let logs_dir = self.project_root.join(&self.config.logs_dir);
        match report::write_log(&logs_dir, summary, &info.version_string, Local::now()) {
            Ok(path) => {
                ui.message(&format!("Installation log saved to: {}", path.display()));
                Some(path)
            }
            Err(e) => {
                tracing::warn!("Writing installation log failed: {}", e);
                ui.warning(&format!("Could not write installation log: {}", e));
                None
            }
        }
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let info = match self.check_version(ui) {
            Ok(info) => info,
            Err(
                e @ (SetupError::InterpreterTooOld { .. }
                | SetupError::InterpreterInspectFailed { .. }),
            ) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_FAILURE));
            }
            Err(e) => return Err(e),
        };

        if !self.confirm_environment(&info, ui)? {
            ui.message("Installation cancelled.");
            return Ok(CommandResult::success());
        }

        upgrade_package_manager(self.packages.as_ref(), ui)?;

        ui.show_header("Reading Requirements");
        let specs = match read_requirements(&self.requirements_path()) {
            Ok(specs) => specs,
            Err(e @ SetupError::RequirementsNotFound { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_FAILURE));
            }
            Err(e) => return Err(e),
        };
        ui.success(&format!("Found {} packages to install", specs.len()));

        let records = install_all(&specs, self.packages.as_ref(), self.timeout(), ui)?;
        self.show_install_summary(&records, ui);

        let verification =
            verify_critical(&self.config.critical_packages, self.interpreter.as_ref(), ui)?;

        let summary = InstallationSummary {
            records,
            verification,
            package_listing: self.package_listing()?,
        };
        let log_path = self.write_log(&summary, &info, ui);

        ui.show_header("Installation Complete");
        if summary.is_success() {
            ui.success("All packages installed successfully!");
            ui.message("\nNext steps:");
            for (i, step) in NEXT_STEPS.iter().enumerate() {
                ui.message(&format!("  {}. {}", i + 1, step));
            }
            Ok(CommandResult::success())
        } else {
            ui.warning("Installation completed with warnings");
            ui.message("Some packages may need manual attention.");
            if let Some(path) = log_path {
                ui.show_hint(&format!("Check the log file for details: {}", path.display()));
            }
            Ok(CommandResult::failure(EXIT_FAILURE))
        }
    }
}
