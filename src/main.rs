//! indico-store - Recently viewed events, categories and cache maintenance
//!
//! Entry point for the indico-store CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use indico_store::cli::commands;
use indico_store::cli::{Cli, Commands};
use indico_store::config::Settings;
use indico_store::storage::RecencyStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Completions { shell } => {
            commands::print_completions(shell);
            return Ok(());
        }
        command => command,
    };

    // Load configuration only for runtime commands.
    let settings = Settings::load()?;

    // Initialize logging
    let default_level = if cli.verbose {
        "debug"
    } else {
        settings.general.log_level.as_str()
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Opened lazily, closed when main returns
    let mut store = RecencyStore::new(settings.database_path());

    match command {
        Commands::Mru(cmd) => commands::mru_command(&settings, &mut store, cmd)?,
        Commands::Db(cmd) => commands::db_command(&mut store, cmd)?,
        Commands::Categories(cmd) => commands::categories_command(&settings, cmd)?,
        Commands::Maintenance(cmd) => {
            commands::maintenance_command(&settings, cmd).await?;
        }
        Commands::Config(cmd) => commands::config_command(&settings, cmd)?,
        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}
