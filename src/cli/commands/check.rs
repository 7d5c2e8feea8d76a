//! Check command implementation.
//!
//! `statenv check` validates the interpreter and the project layout
//! without installing anything.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::cli::args::CheckArgs;
use crate::config::SetupConfig;
use crate::error::{Result, EXIT_FAILURE};
use crate::python::{Interpreter, PythonInterpreter};
use crate::ui::UserInterface;
use crate::validate::{build_checks, run_checks, CheckContext, CheckSelection};

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    config: SetupConfig,
    args: CheckArgs,
    interpreter: Box<dyn Interpreter>,
}

impl CheckCommand {
    /// Create a check command against `python`.
    pub fn new(project_root: &Path, config: SetupConfig, python: &str, args: CheckArgs) -> Self {
        let interpreter = PythonInterpreter::new(python).in_dir(project_root);
        Self::with_interpreter(project_root, config, args, Box::new(interpreter))
    }

    /// Create a check command with an explicit interpreter.
    pub fn with_interpreter(
        project_root: &Path,
        config: SetupConfig,
        args: CheckArgs,
        interpreter: Box<dyn Interpreter>,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
            args,
            interpreter,
        }
    }

    fn selection(&self) -> CheckSelection {
        CheckSelection {
            environment: !self.args.skip_environment,
            project: !self.args.skip_project,
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = &self.config.validation;
        let checks = build_checks(settings, self.selection());
        tracing::debug!("Running {} checks in {}", checks.len(), self.project_root.display());

        let ctx = CheckContext {
            project_root: &self.project_root,
            interpreter: self.interpreter.as_ref(),
            settings,
        };
        let report = run_checks(&checks, &ctx)?;

        if self.args.json {
            let json = report
                .to_json()
                .context("Failed to serialize check results")?;
            println!("{}", json);
        } else {
            report.display(ui);
        }

        if report.is_success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(EXIT_FAILURE))
        }
    }
}
