//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, InstallArgs};
use crate::config::{load_config, resolve_python, SetupConfig};
use crate::error::{Result, SetupError, EXIT_FAILURE, EXIT_SUCCESS};
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: EXIT_SUCCESS,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. No subcommand means `install` with default args.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Check(args)) => {
                let Some((config, python)) = self.load_settings(cli, ui)? else {
                    return Ok(CommandResult::failure(EXIT_FAILURE));
                };
                let cmd =
                    super::check::CheckCommand::new(&self.project_root, config, &python, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Install(args)) => self.install(cli, args.clone(), ui),
            None => self.install(cli, InstallArgs::default(), ui),
        }
    }

    fn install(
        &self,
        cli: &Cli,
        args: InstallArgs,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let Some((config, python)) = self.load_settings(cli, ui)? else {
            return Ok(CommandResult::failure(EXIT_FAILURE));
        };
        let cmd = super::install::InstallCommand::new(&self.project_root, config, &python, args);
        cmd.execute(ui)
    }

    /// Load the config and pick the interpreter.
    ///
    /// A config that fails to parse is reported through `ui` and yields `None`.
    fn load_settings(
        &self,
        cli: &Cli,
        ui: &mut dyn UserInterface,
    ) -> Result<Option<(SetupConfig, String)>> {
        let config = match load_config(&self.project_root, cli.config.as_deref()) {
            Ok(config) => config,
            Err(e @ SetupError::ConfigParseError { .. }) => {
                ui.error(&e.to_string());
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let python = resolve_python(cli.python.as_deref(), &config);
        tracing::debug!("Using interpreter {}", python);
        Ok(Some((config, python)))
    }
}
