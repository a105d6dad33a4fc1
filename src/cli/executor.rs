//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::ServeCommandHandler;
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::{AppError, AppResult};

/// What the caller should do after a command ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Start the HTTP server with the merged settings
    StartServer,
    /// The command finished; exit without serving
    Exit,
}

/// Execute a CLI command with the given settings
///
/// `serve --dry-run` is handled here; a plain `serve` (or no subcommand)
/// asks the caller to start the server.
///
/// # Errors
/// Returns errors from command handlers or validation failures
pub fn execute_command(cli: &Cli, settings: Settings) -> AppResult<CommandOutcome> {
    validate_command_args(cli, &settings)?;

    match &cli.command {
        Some(Commands::Serve { dry_run: true, .. }) => {
            ServeCommandHandler::new(settings).validate_only()?;
            Ok(CommandOutcome::Exit)
        }
        Some(Commands::Serve { .. }) | None => Ok(CommandOutcome::StartServer),
    }
}

/// Validate command arguments before execution
fn validate_command_args(cli: &Cli, settings: &Settings) -> AppResult<()> {
    cli.validate()
        .map_err(|message| AppError::BadRequest { message })?;

    if settings.server.port < 1024 && settings.server.host == "0.0.0.0" {
        tracing::warn!(
            port = settings.server.port,
            "Binding to 0.0.0.0 on a privileged port usually requires root privileges"
        );
    }

    Ok(())
}
