//! Serve command handler
//!
//! Handles the serve command's dry-run validation. Starting the server itself
//! is left to the caller.

use crate::config::Settings;
use crate::error::AppResult;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validate configuration without starting the server
    ///
    /// Prints a short report, including the bind address, to stdout.
    pub fn validate_only(&self) -> AppResult<()> {
        println!("{}", self.dry_run_report()?);
        Ok(())
    }

    /// Report printed by [`validate_only`](Self::validate_only).
    ///
    /// # Errors
    /// Configuration validation errors
    pub fn dry_run_report(&self) -> AppResult<String> {
        self.config.validate()?;

        let store = if self.config.store.seed_sample_data {
            "seeded with sample users"
        } else {
            "empty"
        };
        let openapi = if self.config.server.openapi_enabled {
            "enabled"
        } else {
            "disabled"
        };

        Ok([
            "✓ Configuration is valid".to_string(),
            format!("✓ Server would bind to: {}", self.config.server.address()),
            format!("✓ User store starts {}", store),
            format!("✓ OpenAPI documentation {}", openapi),
            format!("✓ Logger level: {}", self.config.logger.level),
            "Dry run completed successfully - configuration is ready for deployment".to_string(),
        ]
        .join("\n"))
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
