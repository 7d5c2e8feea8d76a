//! statenv CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use statenv::cli::{Cli, CommandDispatcher};
use statenv::error::EXIT_FAILURE;
use statenv::shell::{interrupt, is_ci};
use statenv::ui::{create_ui, OutputMode};
use statenv::SetupError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN, so diagnostics stay out of the installer's output
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("statenv=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("statenv=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("statenv starting with args: {:?}", cli);

    if let Err(e) = interrupt::install_handler() {
        tracing::warn!("Could not install Ctrl-C handler: {}", e);
    }

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // Determine project root
    let project_root = cli
        .project
        .as_ref()
        .cloned()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let mut ui = create_ui(!is_ci(), output_mode);

    let dispatcher = CommandDispatcher::new(project_root);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(SetupError::Interrupted) => {
            ui.warning("Installation cancelled by user.");
            ExitCode::from(SetupError::Interrupted.exit_code() as u8)
        }
        Err(e) => {
            ui.error(&format!("Unexpected error: {}", e));
            ExitCode::from(EXIT_FAILURE as u8)
        }
    }
}
