//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// statenv - Install and validate the Python side of an analysis environment.
#[derive(Debug, Parser)]
#[command(name = "statenv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .statenv/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Python interpreter to install into and check
    #[arg(long, global = true, value_name = "PATH")]
    pub python: Option<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install the packages in the requirements file (default if no command specified)
    Install(InstallArgs),

    /// Validate the Python environment and project layout
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Continue outside a virtual environment without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Requirements file (overrides the configured one)
    #[arg(short, long, value_name = "FILE")]
    pub requirements: Option<PathBuf>,

    /// Per-package install timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip checks that run inside the Python interpreter
    #[arg(long)]
    pub skip_environment: bool,

    /// Skip checks of the project files
    #[arg(long)]
    pub skip_project: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_install() {
        let cli = Cli::try_parse_from(["statenv"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn install_flags() {
        let cli = Cli::try_parse_from([
            "statenv",
            "install",
            "--yes",
            "--requirements",
            "reqs.txt",
            "--timeout",
            "60",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Install(args)) => {
                assert!(args.yes);
                assert_eq!(args.requirements, Some(PathBuf::from("reqs.txt")));
                assert_eq!(args.timeout, Some(60));
            }
            other => panic!("expected install, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "statenv",
            "check",
            "--json",
            "--python",
            "/opt/py/bin/python",
            "--project",
            "/work",
        ])
        .unwrap();

        assert_eq!(cli.python.as_deref(), Some("/opt/py/bin/python"));
        assert_eq!(cli.project, Some(PathBuf::from("/work")));
        assert!(matches!(cli.command, Some(Commands::Check(CheckArgs { json: true, .. }))));
    }

    #[test]
    fn timeout_must_be_a_number() {
        assert!(Cli::try_parse_from(["statenv", "install", "--timeout", "soon"]).is_err());
    }

    #[test]
    fn timeout_must_be_positive() {
        assert!(Cli::try_parse_from(["statenv", "install", "--timeout", "0"]).is_err());
        assert!(Cli::try_parse_from(["statenv", "install", "--timeout", "1"]).is_ok());
    }
}
