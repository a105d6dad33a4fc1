use clap::Parser;

use users_api::cli::{
    Cli, CommandOutcome, execute_command, init_logger_from_settings, load_and_merge_config,
};
use users_api::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, environment) = load_and_merge_config(&cli)?;

    // Dry runs only print; keep their output free of log lines
    if !cli.is_dry_run() {
        init_logger_from_settings(&settings)?;
    }

    match execute_command(&cli, settings.clone())? {
        CommandOutcome::StartServer => Server::new(settings, environment).run().await,
        CommandOutcome::Exit => Ok(()),
    }
}
