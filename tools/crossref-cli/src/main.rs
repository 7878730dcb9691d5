//! # Esports Crossref Binary
//!
//! Collects player rosters from Liquipedia wikis and lists players found on
//! both the reference wiki and any other.

mod cli;
mod config;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, CliHandler};
use config::CrossrefConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = CrossrefConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.validate()?;

    logging::initialize_logging(&config.logging)?;
    info!("Reference site: {}, data directory: {:?}", config.reference_site, config.data_dir);

    let handler = CliHandler::new(config);
    handler.handle_command(cli.command).await?;

    Ok(())
}
